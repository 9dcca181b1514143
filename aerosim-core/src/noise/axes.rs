//! Named axes of the rotor acoustic index space.

use crate::imports::*;

/// One axis of the `(control point, microphone, rotor, radial section, harmonic)`
/// index space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcousticAxis {
    ControlPoint = 0,
    Microphone = 1,
    Rotor = 2,
    Section = 3,
    Harmonic = 4,
}

impl AcousticAxis {
    pub fn axis(self) -> Axis {
        Axis(self as usize)
    }
}

/// Extents of the acoustic index space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcousticAxes {
    pub n_cpt: usize,
    pub n_mic: usize,
    pub n_rot: usize,
    pub n_sec: usize,
    pub n_h: usize,
}

impl AcousticAxes {
    pub fn shape(&self) -> (usize, usize, usize, usize, usize) {
        (self.n_cpt, self.n_mic, self.n_rot, self.n_sec, self.n_h)
    }

    pub fn len_of(&self, axis: AcousticAxis) -> usize {
        match axis {
            AcousticAxis::ControlPoint => self.n_cpt,
            AcousticAxis::Microphone => self.n_mic,
            AcousticAxis::Rotor => self.n_rot,
            AcousticAxis::Section => self.n_sec,
            AcousticAxis::Harmonic => self.n_h,
        }
    }

    /// Repeats `x` across every axis not listed in `onto`.  Axis `i` of `x` maps to
    /// `onto[i]`, and its length must match.
    pub fn broadcast<D: Dimension>(
        &self,
        x: ArrayView<f64, D>,
        onto: &[AcousticAxis],
    ) -> anyhow::Result<Array5<f64>> {
        ensure!(
            x.ndim() == onto.len(),
            AerosimError::configuration(format!(
                "cannot map a {}-d array onto axes {onto:?}",
                x.ndim()
            ))
        );
        for (i, axis) in onto.iter().enumerate() {
            ensure!(
                x.len_of(Axis(i)) == self.len_of(*axis),
                AerosimError::configuration(format!(
                    "array axis {i} has length {} but {axis:?} has length {}",
                    x.len_of(Axis(i)),
                    self.len_of(*axis)
                ))
            );
        }
        let x = x.into_dyn();
        Ok(Array5::from_shape_fn(self.shape(), |(c, m, r, s, h)| {
            let full = [c, m, r, s, h];
            let mut src = [0usize; 5];
            for (i, axis) in onto.iter().enumerate() {
                src[i] = full[*axis as usize];
            }
            x[&src[..onto.len()]]
        }))
    }

    /// one value per control point
    pub fn per_cpt(&self, x: &Array1<f64>) -> anyhow::Result<Array5<f64>> {
        self.broadcast(x.view(), &[AcousticAxis::ControlPoint])
    }

    /// one value per radial section
    pub fn per_section(&self, x: &Array1<f64>) -> anyhow::Result<Array5<f64>> {
        self.broadcast(x.view(), &[AcousticAxis::Section])
    }

    /// one value per harmonic
    pub fn per_harmonic(&self, x: &Array1<f64>) -> anyhow::Result<Array5<f64>> {
        self.broadcast(x.view(), &[AcousticAxis::Harmonic])
    }

    /// `[control point, section]`, e.g. blade loading distributions
    pub fn per_cpt_section(&self, x: &Array2<f64>) -> anyhow::Result<Array5<f64>> {
        self.broadcast(
            x.view(),
            &[AcousticAxis::ControlPoint, AcousticAxis::Section],
        )
    }

    /// `[control point, microphone, rotor, section]`, e.g. observer geometry
    pub fn per_observer(&self, x: &Array4<f64>) -> anyhow::Result<Array5<f64>> {
        self.broadcast(
            x.view(),
            &[
                AcousticAxis::ControlPoint,
                AcousticAxis::Microphone,
                AcousticAxis::Rotor,
                AcousticAxis::Section,
            ],
        )
    }
}

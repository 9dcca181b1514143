//! Noise exposure metrics on a ground microphone grid.

use crate::imports::*;
use crate::noise::decibel::{background_noise, dbsum, spl_arithmetic};
use crate::params::*;

/// Flight schedule for an exposure analysis
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ApproxEq)]
pub struct ExposureSettings {
    /// departure clock times, `HH:MM:SS`
    pub flight_times: Vec<String>,
    /// length of the exposure window [s]
    pub time_period: f64,
}

impl Default for ExposureSettings {
    fn default() -> Self {
        Self {
            flight_times: vec!["12:00:00".into()],
            time_period: DEFAULT_EXPOSURE_PERIOD_S,
        }
    }
}

impl SerdeAPI for ExposureSettings {
    fn init(&mut self) -> anyhow::Result<()> {
        for clock in &self.flight_times {
            utils::clock_to_seconds(clock)?;
        }
        ensure!(
            self.time_period > 0.0,
            AerosimError::configuration(format!(
                "exposure time period must be positive, got {}",
                self.time_period
            ))
        );
        Ok(())
    }
}

/// Cumulative level on the exposure grid, kept so later metrics can reuse it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq)]
pub struct NoiseExposure {
    /// `[time step, x, y]` energy-summed level of every flight [dBA]; NaN where no
    /// flight is heard
    pub temporal_noise_exposure: Array3<f64>,
    /// [s]
    pub time_step: f64,
    pub number_of_timesteps: usize,
    /// seconds after midnight of each time step
    pub time_stamps: Array1<f64>,
}

/// A-weighted noise of one flight on a microphone grid, and the metrics derived from it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq, SerdeAPI)]
pub struct NoiseData {
    /// `[time, x, y]` [dBA]
    #[serde(rename = "SPL_dBA")]
    pub spl_dba: Array3<f64>,
    /// sample times of `spl_dba` [s]
    pub time: Array1<f64>,
    pub microphone_x_resolution: usize,
    pub microphone_y_resolution: usize,
    #[serde(default)]
    pub exposure: Option<NoiseExposure>,
    /// `[x, y]` single event noise exposure level [dBA]
    #[serde(default, rename = "SENEL")]
    pub senel: Option<Array2<f64>>,
    /// `[x, y]` maximum level over the exposure window [dBA]
    #[serde(default)]
    pub l_max: Option<Array2<f64>>,
}

impl NoiseData {
    fn fresh_exposure(&self, settings: &ExposureSettings) -> anyhow::Result<NoiseExposure> {
        let n_t = self.time.len();
        let (nx, ny) = (self.microphone_x_resolution, self.microphone_y_resolution);
        ensure!(
            n_t >= 2,
            AerosimError::configuration("at least two time samples are needed to set a time step")
        );
        ensure!(
            self.spl_dba.dim() == (n_t, nx, ny),
            AerosimError::configuration(format!(
                "SPL grid has shape {:?}, expected {:?}",
                self.spl_dba.shape(),
                [n_t, nx, ny]
            ))
        );
        let time_step = self.time[1] - self.time[0];
        ensure!(
            time_step > 0.0,
            AerosimError::configuration(format!("time step must be positive, got {time_step}"))
        );
        let number_of_timesteps = (settings.time_period / time_step).floor() as usize;

        let floor = background_noise();
        let spl = self
            .spl_dba
            .mapv(|x| if x == floor { f64::NAN } else { x });
        let mut tne = Array3::<f64>::from_elem((number_of_timesteps, nx, ny), f64::NAN);
        for (i, clock) in settings.flight_times.iter().enumerate() {
            let departure = utils::clock_to_seconds(clock)
                .with_context(|| format!("flight {i}"))?;
            let t0 = ((departure - EXPOSURE_GRID_START_S) / time_step).floor() as i64;
            let end = t0 + n_t as i64;
            ensure!(
                t0 >= 0 && end <= number_of_timesteps as i64,
                AerosimError::WindowBounds {
                    flight: i,
                    start: t0,
                    end,
                    n_steps: number_of_timesteps,
                }
            );
            let mut window = tne.slice_mut(s![t0 as usize..end as usize, .., ..]);
            Zip::from(&mut window)
                .and(&spl)
                .for_each(|cum, &level| *cum = dbsum(*cum, level));
            #[cfg(feature = "logging")]
            log::debug!("{}", format_dbg!((i, clock, t0, end)));
        }

        Ok(NoiseExposure {
            temporal_noise_exposure: tne,
            time_step,
            number_of_timesteps,
            time_stamps: Array1::from_shape_fn(number_of_timesteps, |k| {
                EXPOSURE_GRID_START_S + k as f64 * time_step
            }),
        })
    }

    /// Single event noise exposure level of every grid cell: the energy sum of the
    /// samples within 10 dB of the cell's maximum over the exposure window.
    ///
    /// The first call folds every flight of `settings` into a fresh exposure grid;
    /// later calls reuse the stored grid and ignore `settings`.
    #[timer]
    pub fn senel_noise_metric(&mut self, settings: &ExposureSettings) -> anyhow::Result<()> {
        let exposure = match self.exposure.take() {
            Some(exposure) => exposure,
            None => self.fresh_exposure(settings)?,
        };
        let tne = &exposure.temporal_noise_exposure;
        let l_max = utils::nanmax_axis(tne.view(), Axis(0));
        let bound = l_max.mapv(|x| x - SENEL_BOUND_DB);
        let mut valid = tne.clone();
        Zip::from(valid.lanes_mut(Axis(0)))
            .and(&bound)
            .for_each(|mut lane, &lo| {
                lane.mapv_inplace(|x| if x < lo { f64::NAN } else { x })
            });
        self.senel = Some(spl_arithmetic(valid.view(), Axis(0)));
        self.l_max = Some(l_max);
        self.exposure = Some(exposure);
        Ok(())
    }
}

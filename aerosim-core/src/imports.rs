#![allow(unused_imports)]

pub(crate) use anyhow::{anyhow, bail, ensure, Context};
pub(crate) use lazy_static::lazy_static;
#[cfg(feature = "logging")]
pub(crate) use log;
pub(crate) use ndarray::{
    array, s, Array, Array1, Array2, Array3, Array4, Array5, ArrayView, ArrayView1, Axis,
    Dimension, RemoveAxis, Zip,
};
pub(crate) use num_complex::Complex64;
pub(crate) use regex::Regex;
pub(crate) use serde::{Deserialize, Serialize};
pub(crate) use std::collections::{BTreeMap, HashMap};
pub(crate) use std::ffi::OsStr;
pub(crate) use std::fs::File;
pub(crate) use std::path::Path;

pub(crate) use crate::error::AerosimError;
pub(crate) use crate::proc_macros::{timer, ApproxEq, SerdeAPI};
pub(crate) use crate::traits::*;
pub(crate) use crate::utils;

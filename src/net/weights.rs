//! Weight sets and weight files
//!
//! A weight set is an ordered list of independently shaped arrays, one
//! kernel and one bias per layer, using the Keras layouts:
//!
//! - convolution kernels: `[kernel, kernel, in_channels, filters]`
//! - dense kernels: `[in, out]`
//! - biases: `[out]`
//!
//! Weight files are JSON documents holding one nested array per weight
//! array, the shape being implied by the nesting.

use anyhow::Context;
use log::debug;
use serde_json::Value;
use std::path::Path;

use crate::error::{AtariError, AtariResult};

/// One trainable tensor, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct WeightArray {
    shape: Vec<usize>,
    values: Vec<f32>,
}

impl WeightArray {
    pub fn new(shape: Vec<usize>, values: Vec<f32>) -> AtariResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(AtariError::WeightFormat(format!(
                "shape {:?} needs {} values, got {}",
                shape,
                expected,
                values.len()
            )));
        }
        Ok(Self { shape, values })
    }

    pub fn filled(shape: Vec<usize>, value: f32) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            values: vec![value; len],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply `f` to every element, keeping the shape
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            shape: self.shape.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Replace every element equal to `target`, returning how many changed
    pub fn replace_exact(&mut self, target: f32, replacement: f32) -> usize {
        let mut replaced = 0;
        for value in self.values.iter_mut().filter(|v| **v == target) {
            *value = replacement;
            replaced += 1;
        }
        replaced
    }

    fn to_json(&self) -> Value {
        fn nest(shape: &[usize], values: &[f32]) -> Value {
            match shape.split_first() {
                None => Value::from(values[0]),
                Some((_, rest)) if rest.is_empty() => {
                    Value::Array(values.iter().map(|&v| Value::from(v)).collect())
                }
                Some((&len, rest)) => {
                    let stride: usize = rest.iter().product();
                    Value::Array(
                        (0..len)
                            .map(|i| nest(rest, &values[i * stride..(i + 1) * stride]))
                            .collect(),
                    )
                }
            }
        }
        nest(&self.shape, &self.values)
    }

    fn from_json(value: &Value) -> AtariResult<Self> {
        if !value.is_array() {
            return Err(AtariError::WeightFormat(
                "each weight entry must be an array".to_string(),
            ));
        }

        // Shape follows the first element at each depth; rectangularity is
        // checked while flattening.
        let mut shape = Vec::new();
        let mut cursor = value;
        while let Value::Array(items) = cursor {
            shape.push(items.len());
            match items.first() {
                Some(first) => cursor = first,
                None => break,
            }
        }

        let mut values = Vec::with_capacity(shape.iter().product());
        flatten(value, &shape, &mut values)?;
        Self::new(shape, values)
    }
}

fn flatten(value: &Value, shape: &[usize], out: &mut Vec<f32>) -> AtariResult<()> {
    match (value, shape.split_first()) {
        (Value::Array(items), Some((&len, rest))) => {
            if items.len() != len {
                return Err(AtariError::WeightFormat(format!(
                    "ragged array: expected {} elements, found {}",
                    len,
                    items.len()
                )));
            }
            items.iter().try_for_each(|item| flatten(item, rest, out))
        }
        (Value::Number(number), None) => {
            let v = number.as_f64().ok_or_else(|| {
                AtariError::WeightFormat(format!("non-finite number {}", number))
            })?;
            out.push(v as f32);
            Ok(())
        }
        (other, _) => Err(AtariError::WeightFormat(format!(
            "unexpected element {} at depth {}",
            other,
            shape.len()
        ))),
    }
}

/// Complete parameter collection of a network, in layer order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightSet {
    arrays: Vec<WeightArray>,
}

impl WeightSet {
    pub fn new(arrays: Vec<WeightArray>) -> Self {
        Self { arrays }
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeightArray> {
        self.arrays.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, WeightArray> {
        self.arrays.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&WeightArray> {
        self.arrays.get(index)
    }

    pub fn shapes(&self) -> Vec<Vec<usize>> {
        self.arrays.iter().map(|a| a.shape.clone()).collect()
    }

    /// Total number of scalar parameters
    pub fn parameter_count(&self) -> usize {
        self.arrays.iter().map(WeightArray::len).sum()
    }

    /// Affine map of `[minval, maxval]` onto `[0, 1]`
    pub fn scaled(&self, minval: f32, maxval: f32) -> Self {
        let span = maxval - minval;
        Self {
            arrays: self
                .arrays
                .iter()
                .map(|a| a.map(|v| (v - minval) / span))
                .collect(),
        }
    }

    pub fn into_arrays(self) -> Vec<WeightArray> {
        self.arrays
    }
}

impl From<Vec<WeightArray>> for WeightSet {
    fn from(arrays: Vec<WeightArray>) -> Self {
        Self::new(arrays)
    }
}

impl IntoIterator for WeightSet {
    type Item = WeightArray;
    type IntoIter = std::vec::IntoIter<WeightArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.arrays.into_iter()
    }
}

/// Decode a weight set from the JSON text of a weight file
pub fn parse_weights(json: &str) -> AtariResult<WeightSet> {
    let document: Value = serde_json::from_str(json)?;
    let Value::Array(entries) = document else {
        return Err(AtariError::WeightFormat(
            "weight file must hold a list of arrays".to_string(),
        ));
    };

    entries
        .iter()
        .map(WeightArray::from_json)
        .collect::<AtariResult<Vec<_>>>()
        .map(WeightSet::new)
}

/// Read a weight set previously written by the external search process
pub fn read_weight_file(path: &Path) -> anyhow::Result<WeightSet> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read weights from {:?}", path))?;
    let weights =
        parse_weights(&json).with_context(|| format!("Failed to decode weights in {:?}", path))?;
    debug!(
        "read {} weight arrays ({} parameters) from {:?}",
        weights.len(),
        weights.parameter_count(),
        path
    );
    Ok(weights)
}

/// Write a weight set in the same nested-array layout it is read from
pub fn write_weight_file(path: &Path, weights: &WeightSet) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let document = Value::Array(weights.iter().map(WeightArray::to_json).collect());
    let json = serde_json::to_string(&document).context("Failed to serialize weights")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write weights to {:?}", path))?;
    Ok(())
}

/// Reorder a burn convolution kernel `[out, in, kh, kw]` into `[kh, kw, in, out]`
pub(crate) fn oihw_to_hwio(values: &[f32], [o, i, h, w]: [usize; 4]) -> Vec<f32> {
    let mut out = vec![0.0; values.len()];
    for oo in 0..o {
        for ii in 0..i {
            for hh in 0..h {
                for ww in 0..w {
                    let src = ((oo * i + ii) * h + hh) * w + ww;
                    let dst = ((hh * w + ww) * i + ii) * o + oo;
                    out[dst] = values[src];
                }
            }
        }
    }
    out
}

/// Reorder a `[kh, kw, in, out]` kernel into burn's `[out, in, kh, kw]`
pub(crate) fn hwio_to_oihw(values: &[f32], [h, w, i, o]: [usize; 4]) -> Vec<f32> {
    let mut out = vec![0.0; values.len()];
    for hh in 0..h {
        for ww in 0..w {
            for ii in 0..i {
                for oo in 0..o {
                    let src = ((hh * w + ww) * i + ii) * o + oo;
                    let dst = ((oo * i + ii) * h + hh) * w + ww;
                    out[dst] = values[src];
                }
            }
        }
    }
    out
}

//! Bounded-weight convolutional network for Atari agents
//!
//! # Architecture
//!
//! ```text
//! Input: [batch, H, W, C]        (channels last, as the environment emits it)
//!   ↓ N × Conv2d(filters, kernel, stride, valid padding) + conv activation
//!   ↓ Flatten in (H, W, C) order
//!   ↓ M × Linear(width) + fc activation
//!   ↓ Linear(action_shape), no activation
//! Output: [batch, action_shape]
//! ```
//!
//! Every kernel and bias starts uniformly distributed in the configured
//! weight bounds. The network is never trained here: weights come from an
//! external search process through [`AtariNet::set_weights`].

use burn::{
    module::{Module, Param},
    nn::{
        Initializer, Linear, LinearConfig,
        conv::{Conv2d, Conv2dConfig},
    },
    tensor::{Tensor, TensorData, backend::Backend},
};
use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::iter::once;

use super::config::{Activation, NetConfig, WeightBounds};
use super::weights::{WeightArray, WeightSet, hwio_to_oihw, oihw_to_hwio};
use crate::error::{AtariError, AtariResult};

/// Ordered layer stack owned by [`AtariNet`]
#[derive(Module, Debug)]
pub struct LayerStack<B: Backend> {
    convs: Vec<Conv2d<B>>,
    hidden: Vec<Linear<B>>,
    output: Linear<B>,
}

impl<B: Backend> LayerStack<B> {
    fn forward(
        &self,
        input: Tensor<B, 4>,
        conv_activation: Activation,
        fc_activation: Activation,
    ) -> Tensor<B, 2> {
        // [batch, H, W, C] → [batch, C, H, W]
        let mut x = input.permute([0, 3, 1, 2]);
        for conv in &self.convs {
            x = conv_activation.apply(conv.forward(x));
        }

        // Back to channels last so the flattened layout matches Keras weights
        let x = x.permute([0, 2, 3, 1]);
        let [batch, height, width, channels] = x.dims();
        let mut x = x.reshape([batch, height * width * channels]);

        for dense in &self.hidden {
            x = fc_activation.apply(dense.forward(x));
        }

        self.output.forward(x)
    }
}

/// Network wrapper exposing only what playback and search need
///
/// Wraps a [`LayerStack`] instead of extending it, so callers only see
/// action selection and weight import/export.
pub struct AtariNet<B: Backend> {
    layers: LayerStack<B>,
    conv_activation: Activation,
    fc_activation: Activation,
    input_shape: [usize; 3],
    action_shape: usize,
    bounds: WeightBounds,
    /// Expected shape of every weight array, in order
    weight_shapes: Vec<Vec<usize>>,
    device: B::Device,
    rng: StdRng,
}

impl<B: Backend> AtariNet<B> {
    /// Build a network for observations of shape `[height, width, channels]`
    ///
    /// # Errors
    ///
    /// Invalid bounds, an invalid configuration, an empty action space or a
    /// convolution stack that shrinks the observation below one pixel.
    pub fn new(
        input_shape: [usize; 3],
        action_shape: usize,
        net_conf: &NetConfig,
        bounds: WeightBounds,
        device: &B::Device,
    ) -> AtariResult<Self> {
        bounds.validate()?;
        net_conf.validate()?;

        if action_shape == 0 {
            return Err(AtariError::Topology("action space is empty".to_string()));
        }
        if input_shape.contains(&0) {
            return Err(AtariError::Topology(format!(
                "observation shape {:?} has an empty dimension",
                input_shape
            )));
        }

        let initializer = Initializer::Uniform {
            min: bounds.minval as f64,
            max: bounds.maxval as f64,
        };

        let [mut height, mut width, mut channels] = input_shape;
        let mut weight_shapes = Vec::new();

        let mut convs = Vec::with_capacity(net_conf.conv_layer_params.len());
        for (i, conv) in net_conf.conv_layer_params.iter().enumerate() {
            let (filters, kernel, stride) = (conv.filters(), conv.kernel_size(), conv.stride());
            if kernel > height || kernel > width {
                return Err(AtariError::Topology(format!(
                    "conv layer {} kernel {} exceeds its {}x{} input",
                    i, kernel, height, width
                )));
            }

            convs.push(
                Conv2dConfig::new([channels, filters], [kernel, kernel])
                    .with_stride([stride, stride])
                    .with_initializer(initializer.clone())
                    .init(device),
            );
            weight_shapes.push(vec![kernel, kernel, channels, filters]);
            weight_shapes.push(vec![filters]);

            height = (height - kernel) / stride + 1;
            width = (width - kernel) / stride + 1;
            channels = filters;
        }

        let mut features = height * width * channels;
        let mut hidden = Vec::with_capacity(net_conf.fc_layer_params.len());
        for &units in &net_conf.fc_layer_params {
            hidden.push(
                LinearConfig::new(features, units)
                    .with_initializer(initializer.clone())
                    .init(device),
            );
            weight_shapes.push(vec![features, units]);
            weight_shapes.push(vec![units]);
            features = units;
        }

        let output = LinearConfig::new(features, action_shape)
            .with_initializer(initializer)
            .init(device);
        weight_shapes.push(vec![features, action_shape]);
        weight_shapes.push(vec![action_shape]);

        debug!(
            "built network for {:?} observations: {} conv, {} dense, {} actions",
            input_shape,
            convs.len(),
            hidden.len(),
            action_shape
        );

        Ok(Self {
            layers: LayerStack {
                convs,
                hidden,
                output,
            },
            conv_activation: net_conf.conv_activation,
            fc_activation: net_conf.fc_activation,
            input_shape,
            action_shape,
            bounds,
            weight_shapes,
            device: device.clone(),
            rng: StdRng::from_entropy(),
        })
    }

    /// Replace the random source used for epsilon-greedy exploration
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn action_shape(&self) -> usize {
        self.action_shape
    }

    pub fn input_shape(&self) -> [usize; 3] {
        self.input_shape
    }

    pub fn bounds(&self) -> WeightBounds {
        self.bounds
    }

    /// Shapes `get_weights` returns and `set_weights` accepts
    pub fn weight_shapes(&self) -> &[Vec<usize>] {
        &self.weight_shapes
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Current parameters, kernel then bias for every layer in order
    pub fn get_weights(&self) -> AtariResult<WeightSet> {
        let mut arrays = Vec::with_capacity(self.weight_shapes.len());

        for conv in &self.layers.convs {
            let kernel = conv.weight.val();
            let [out, inp, kh, kw] = kernel.dims();
            let values = tensor_values(kernel)?;
            arrays.push(WeightArray::new(
                vec![kh, kw, inp, out],
                oihw_to_hwio(&values, [out, inp, kh, kw]),
            )?);
            arrays.push(bias_array(conv.bias.as_ref())?);
        }

        for dense in self.layers.hidden.iter().chain(once(&self.layers.output)) {
            let kernel = dense.weight.val();
            let dims = kernel.dims();
            arrays.push(WeightArray::new(dims.to_vec(), tensor_values(kernel)?)?);
            arrays.push(bias_array(dense.bias.as_ref())?);
        }

        Ok(WeightSet::new(arrays))
    }

    /// Current parameters mapped from `[minval, maxval]` onto `[0, 1]`
    pub fn get_scaled_weights(&self) -> AtariResult<WeightSet> {
        Ok(self
            .get_weights()?
            .scaled(self.bounds.minval, self.bounds.maxval))
    }

    /// Install a complete weight set
    ///
    /// Values exactly equal to `minval` are raised to `minval + val_buffer`,
    /// array by array, before the weights are applied. Nothing changes if any
    /// array count or shape disagrees with the network.
    pub fn set_weights(&mut self, weights: WeightSet) -> AtariResult<()> {
        if weights.len() != self.weight_shapes.len() {
            return Err(AtariError::WeightCount {
                expected: self.weight_shapes.len(),
                got: weights.len(),
            });
        }
        for (index, (array, expected)) in weights.iter().zip(&self.weight_shapes).enumerate() {
            if array.shape() != expected.as_slice() {
                return Err(AtariError::WeightShape {
                    index,
                    expected: expected.clone(),
                    got: array.shape().to_vec(),
                });
            }
        }

        let mut arrays = weights.into_arrays();
        for (index, array) in arrays.iter_mut().enumerate() {
            let replaced = array.replace_exact(self.bounds.minval, self.bounds.replace_min());
            if replaced > 0 {
                debug!(
                    "raised {} values on the lower bound in weight array {}",
                    replaced, index
                );
            }
        }

        // Counts were checked above, so every layer finds its kernel and bias
        let mut arrays = arrays.into_iter();
        let device = &self.device;

        for conv in self.layers.convs.iter_mut() {
            let (Some(kernel), Some(bias)) = (arrays.next(), arrays.next()) else {
                break;
            };
            let [kh, kw, inp, out] = dims4(kernel.shape());
            let values = hwio_to_oihw(kernel.values(), [kh, kw, inp, out]);
            conv.weight = Param::from_tensor(Tensor::from_data(
                TensorData::new(values, [out, inp, kh, kw]),
                device,
            ));
            conv.bias = Some(bias_param(bias, device));
        }

        for dense in self
            .layers
            .hidden
            .iter_mut()
            .chain(once(&mut self.layers.output))
        {
            let (Some(kernel), Some(bias)) = (arrays.next(), arrays.next()) else {
                break;
            };
            let shape = [kernel.shape()[0], kernel.shape()[1]];
            dense.weight = Param::from_tensor(Tensor::from_data(
                TensorData::new(kernel.into_values(), shape),
                device,
            ));
            dense.bias = Some(bias_param(bias, device));
        }

        Ok(())
    }

    /// Output activations for a batch of observations `[batch, H, W, C]`
    pub fn predict(&self, observations: Tensor<B, 4>) -> Tensor<B, 2> {
        self.layers
            .forward(observations, self.conv_activation, self.fc_activation)
    }

    /// Epsilon-greedy action for a single `[H, W, C]` observation
    ///
    /// An epsilon of exactly zero never consults the random source.
    pub fn action(&mut self, observation: Tensor<B, 3>, epsilon: f64) -> AtariResult<usize> {
        if epsilon != 0.0 && epsilon > self.rng.gen::<f64>() {
            return Ok(self.rng.gen_range(0..self.action_shape));
        }

        if observation.dims() != self.input_shape {
            return Err(AtariError::Topology(format!(
                "observation shape {:?} does not match network input {:?}",
                observation.dims(),
                self.input_shape
            )));
        }

        let activations = self.predict(observation.unsqueeze_dim(0));
        Ok(argmax(&tensor_values(activations)?))
    }
}

/// Index of the largest value; the first one wins ties and NaN never wins
pub fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best, best_value), (i, &v)| {
            if v > best_value { (i, v) } else { (best, best_value) }
        })
        .0
}

fn tensor_values<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> AtariResult<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|err| AtariError::TensorData(format!("{:?}", err)))
}

fn bias_array<B: Backend>(bias: Option<&Param<Tensor<B, 1>>>) -> AtariResult<WeightArray> {
    let bias = bias.ok_or_else(|| AtariError::Topology("layer has no bias".to_string()))?;
    let tensor = bias.val();
    let dims = tensor.dims();
    WeightArray::new(dims.to_vec(), tensor_values(tensor)?)
}

fn bias_param<B: Backend>(bias: WeightArray, device: &B::Device) -> Param<Tensor<B, 1>> {
    let len = bias.len();
    Param::from_tensor(Tensor::from_data(
        TensorData::new(bias.into_values(), [len]),
        device,
    ))
}

fn dims4(shape: &[usize]) -> [usize; 4] {
    [shape[0], shape[1], shape[2], shape[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::config::ConvLayerParams;
    use crate::net::{InferenceBackend, default_device};

    type TestBackend = InferenceBackend;

    fn small_config() -> NetConfig {
        NetConfig {
            conv_layer_params: vec![ConvLayerParams(4, 3, 1)],
            conv_activation: Activation::Relu,
            fc_layer_params: vec![8],
            fc_activation: Activation::Relu,
        }
    }

    fn small_net() -> AtariNet<TestBackend> {
        AtariNet::new(
            [10, 10, 2],
            4,
            &small_config(),
            WeightBounds::default(),
            &default_device(),
        )
        .unwrap()
    }

    /// Deterministic weights inside (-1, 1) that never touch the bounds
    fn patterned_weights(shapes: &[Vec<usize>]) -> WeightSet {
        WeightSet::new(
            shapes
                .iter()
                .enumerate()
                .map(|(layer, shape)| {
                    let len = shape.iter().product();
                    let values = (0..len)
                        .map(|i| ((i * 7 + layer * 3) % 17) as f32 / 10.0 - 0.8)
                        .collect();
                    WeightArray::new(shape.clone(), values).unwrap()
                })
                .collect(),
        )
    }

    #[test]
    fn test_weight_shapes_follow_topology() {
        let net = small_net();
        // 10x10x2 → conv(4, k3, s1) → 8x8x4 = 256 → dense 8 → output 4
        assert_eq!(
            net.weight_shapes(),
            &[
                vec![3, 3, 2, 4],
                vec![4],
                vec![256, 8],
                vec![8],
                vec![8, 4],
                vec![4],
            ]
        );
    }

    #[test]
    fn test_output_layer_matches_action_count() {
        let device = default_device();
        for actions in [1, 3, 6, 18] {
            let net = AtariNet::<TestBackend>::new(
                [12, 12, 1],
                actions,
                &small_config(),
                WeightBounds::default(),
                &device,
            )
            .unwrap();

            let shapes = net.weight_shapes();
            assert_eq!(shapes[shapes.len() - 1], vec![actions]);
            assert_eq!(shapes[shapes.len() - 2][1], actions);

            let out = net.predict(Tensor::zeros([2, 12, 12, 1], &device));
            assert_eq!(out.dims(), [2, actions]);
        }
    }

    #[test]
    fn test_output_layer_is_linear() {
        let mut net = small_net();
        let mut weights = patterned_weights(net.weight_shapes());
        // Zero every kernel, leave negative output biases in place
        for array in weights.iter_mut() {
            array.values_mut().fill(0.0);
        }
        let last = weights.len() - 1;
        if let Some(bias) = weights.iter_mut().nth(last) {
            bias.values_mut().copy_from_slice(&[-0.5, -0.25, 0.25, 0.75]);
        }
        net.set_weights(weights).unwrap();

        let out = net.predict(Tensor::ones([1, 10, 10, 2], &default_device()));
        let values = tensor_values(out).unwrap();
        assert_eq!(values, vec![-0.5, -0.25, 0.25, 0.75]);
    }

    #[test]
    fn test_initial_weights_within_bounds() {
        let device = default_device();
        for (minval, maxval) in [(-1.0, 1.0), (0.0, 0.5), (-3.0, -2.0)] {
            let bounds = WeightBounds::new(minval, maxval, 1e-6).unwrap();
            let net =
                AtariNet::<TestBackend>::new([10, 10, 2], 4, &small_config(), bounds, &device)
                    .unwrap();

            let weights = net.get_weights().unwrap();
            assert_eq!(weights.shapes(), net.weight_shapes());
            for array in weights.iter() {
                for &v in array.values() {
                    assert!(
                        (minval..=maxval).contains(&v),
                        "{} outside [{}, {}]",
                        v,
                        minval,
                        maxval
                    );
                }
            }
        }
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let mut net = small_net();
        let weights = patterned_weights(net.weight_shapes());

        net.set_weights(weights.clone()).unwrap();
        assert_eq!(net.get_weights().unwrap(), weights);
    }

    #[test]
    fn test_set_weights_nudges_lower_bound() {
        crate::logging::init_test_logging();
        let mut net = small_net();
        let mut weights = patterned_weights(net.weight_shapes());
        let original = weights.clone();

        if let Some(array) = weights.iter_mut().nth(2) {
            array.values_mut()[5] = -1.0;
        }
        net.set_weights(weights).unwrap();

        let loaded = net.get_weights().unwrap();
        let replace_min = WeightBounds::default().replace_min();
        for (index, (got, want)) in loaded.iter().zip(original.iter()).enumerate() {
            for (pos, (&g, &w)) in got.values().iter().zip(want.values()).enumerate() {
                if index == 2 && pos == 5 {
                    assert_eq!(g, replace_min);
                } else {
                    assert_eq!(g, w);
                }
            }
        }
    }

    #[test]
    fn test_set_weights_rejects_wrong_count() {
        let mut net = small_net();
        let mut arrays = patterned_weights(net.weight_shapes()).into_arrays();
        arrays.pop();

        let err = net.set_weights(WeightSet::new(arrays)).unwrap_err();
        assert!(matches!(
            err,
            AtariError::WeightCount {
                expected: 6,
                got: 5
            }
        ));
    }

    #[test]
    fn test_set_weights_rejects_wrong_shape() {
        let mut net = small_net();
        let before = net.get_weights().unwrap();

        let mut shapes = net.weight_shapes().to_vec();
        shapes[2] = vec![128, 16];
        shapes[3] = vec![16];
        let err = net.set_weights(patterned_weights(&shapes)).unwrap_err();

        assert!(matches!(err, AtariError::WeightShape { index: 2, .. }));
        assert_eq!(net.get_weights().unwrap(), before);
    }

    #[test]
    fn test_scaled_weights() {
        let mut net = small_net();
        let shapes = net.weight_shapes().to_vec();

        let at_max = WeightSet::new(
            shapes
                .iter()
                .map(|s| WeightArray::filled(s.clone(), 1.0))
                .collect(),
        );
        net.set_weights(at_max).unwrap();
        let scaled = net.get_scaled_weights().unwrap();
        assert!(scaled.iter().all(|a| a.values().iter().all(|&v| v == 1.0)));

        let at_zero = WeightSet::new(
            shapes
                .iter()
                .map(|s| WeightArray::filled(s.clone(), 0.0))
                .collect(),
        );
        net.set_weights(at_zero).unwrap();
        let scaled = net.get_scaled_weights().unwrap();
        assert!(scaled.iter().all(|a| a.values().iter().all(|&v| v == 0.5)));

        // The lower bound itself is nudged on import, so it scales just above 0
        let at_min = WeightSet::new(
            shapes
                .iter()
                .map(|s| WeightArray::filled(s.clone(), -1.0))
                .collect(),
        );
        net.set_weights(at_min).unwrap();
        let scaled = net.get_scaled_weights().unwrap();
        assert!(
            scaled
                .iter()
                .all(|a| a.values().iter().all(|&v| v > 0.0 && v < 1e-5))
        );
    }

    #[test]
    fn test_scaled_weights_monotonic() {
        let mut net = small_net();
        let weights = patterned_weights(net.weight_shapes());
        net.set_weights(weights.clone()).unwrap();

        let scaled = net.get_scaled_weights().unwrap();
        assert_eq!(scaled.shapes(), weights.shapes());
        for (raw, scaled) in weights.iter().zip(scaled.iter()) {
            let pairs: Vec<(f32, f32)> = raw
                .values()
                .iter()
                .copied()
                .zip(scaled.values().iter().copied())
                .collect();
            for &(r, s) in &pairs {
                assert!((s - (r + 1.0) / 2.0).abs() < 1e-6);
            }
            for window in pairs.windows(2) {
                let ((r0, s0), (r1, s1)) = (window[0], window[1]);
                assert_eq!(r0 < r1, s0 < s1);
            }
        }
    }

    #[test]
    fn test_flatten_uses_channels_last_order() {
        let device = default_device();
        let config = NetConfig {
            conv_layer_params: vec![ConvLayerParams(2, 1, 1)],
            conv_activation: Activation::Linear,
            fc_layer_params: vec![],
            fc_activation: Activation::Linear,
        };
        let mut net =
            AtariNet::<TestBackend>::new([1, 2, 2], 4, &config, WeightBounds::default(), &device)
                .unwrap();

        // Identity 1x1 convolution and identity output layer
        let identity = |n: usize| -> Vec<f32> {
            (0..n * n)
                .map(|i| if i / n == i % n { 1.0 } else { 0.0 })
                .collect()
        };
        let weights = WeightSet::new(vec![
            WeightArray::new(vec![1, 1, 2, 2], identity(2)).unwrap(),
            WeightArray::filled(vec![2], 0.0),
            WeightArray::new(vec![4, 4], identity(4)).unwrap(),
            WeightArray::filled(vec![4], 0.0),
        ]);
        net.set_weights(weights).unwrap();

        // h0w0 = (1, 10), h0w1 = (2, 20)
        let obs = Tensor::<TestBackend, 3>::from_data(
            TensorData::new(vec![1.0f32, 10.0, 2.0, 20.0], [1, 2, 2]),
            &device,
        );
        let out = tensor_values(net.predict(obs.clone().unsqueeze_dim(0))).unwrap();
        assert_eq!(out, vec![1.0, 10.0, 2.0, 20.0]);
        assert_eq!(net.action(obs, 0.0).unwrap(), 3);
    }

    #[test]
    fn test_zero_epsilon_never_draws() {
        let mut net = small_net().with_seed(11);
        let obs = Tensor::<TestBackend, 3>::ones([10, 10, 2], &default_device());

        let rng_before = net.rng.clone();
        let first = net.action(obs.clone(), 0.0).unwrap();
        for _ in 0..20 {
            assert_eq!(net.action(obs.clone(), 0.0).unwrap(), first);
        }

        let mut untouched = net.rng.clone();
        let mut fresh = rng_before;
        assert_eq!(untouched.gen::<u64>(), fresh.gen::<u64>());
    }

    #[test]
    fn test_full_epsilon_always_random() {
        let mut net = small_net().with_seed(3);
        let obs = Tensor::<TestBackend, 3>::zeros([10, 10, 2], &default_device());

        let mut expected_rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let draw = expected_rng.gen::<f64>();
            assert!(1.0 > draw);
            let expected = expected_rng.gen_range(0..4);

            let action = net.action(obs.clone(), 1.0).unwrap();
            assert_eq!(action, expected);
            seen[action] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_greedy_tie_takes_first_index() {
        let mut net = small_net();
        let mut weights = patterned_weights(net.weight_shapes());
        for array in weights.iter_mut() {
            array.values_mut().fill(0.0);
        }
        if let Some(bias) = weights.iter_mut().last() {
            bias.values_mut().copy_from_slice(&[0.5, 2.0, 2.0, 1.0]);
        }
        net.set_weights(weights).unwrap();

        let obs = Tensor::<TestBackend, 3>::ones([10, 10, 2], &default_device());
        assert_eq!(net.action(obs, 0.0).unwrap(), 1);
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.6, 0.2, 0.1]), 1);
        assert_eq!(argmax(&[3.0, 3.0, 1.0]), 0);
        assert_eq!(argmax(&[-2.0, -1.0, -1.0]), 1);
        assert_eq!(argmax(&[f32::NAN, 0.5, 0.5]), 1);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn test_atari_sized_network() {
        let device = default_device();
        let mut net = AtariNet::<TestBackend>::new(
            [84, 84, 1],
            4,
            &small_config(),
            WeightBounds::default(),
            &device,
        )
        .unwrap();

        let obs = Tensor::<TestBackend, 3>::random(
            [84, 84, 1],
            burn::tensor::Distribution::Uniform(0.0, 255.0),
            &device,
        );
        let out = net.predict(obs.clone().unsqueeze_dim(0));
        assert_eq!(out.dims(), [1, 4]);

        let action = net.action(obs, 0.0).unwrap();
        assert!(action < 4);
    }

    #[test]
    fn test_observation_shape_mismatch() {
        let mut net = small_net();
        let obs = Tensor::<TestBackend, 3>::zeros([9, 10, 2], &default_device());
        assert!(matches!(
            net.action(obs, 0.0),
            Err(AtariError::Topology(_))
        ));
    }

    #[test]
    fn test_kernel_larger_than_input() {
        let config = NetConfig {
            conv_layer_params: vec![ConvLayerParams(4, 8, 4), ConvLayerParams(4, 4, 1)],
            ..small_config()
        };
        let result = AtariNet::<TestBackend>::new(
            [12, 12, 1],
            4,
            &config,
            WeightBounds::default(),
            &default_device(),
        );
        assert!(matches!(result, Err(AtariError::Topology(_))));
    }

    #[test]
    fn test_empty_action_space() {
        let result = AtariNet::<TestBackend>::new(
            [10, 10, 2],
            0,
            &small_config(),
            WeightBounds::default(),
            &default_device(),
        );
        assert!(result.is_err());
    }
}

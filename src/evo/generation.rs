//! New generations of bounded-weight agents
//!
//! A new generation keeps the elite agent unchanged and fills the rest of
//! the population with offspring. Each offspring comes either from two
//! tournament winners through uniform crossover, or from a single winner
//! (the exploration subpopulation), and is then mutated by redrawing weights
//! uniformly inside the weight bounds.

use burn::tensor::backend::Backend;
use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::index};

use super::config::EvoConfig;
use crate::error::{AtariError, AtariResult};
use crate::net::{AtariNet, NetConfig, WeightArray, WeightBounds, WeightSet};

pub struct AtariGen<B: Backend> {
    evo_conf: EvoConfig,
    net_conf: NetConfig,
    obs_shape: [usize; 3],
    action_shape: usize,
    device: B::Device,
    rng: StdRng,
}

impl<B: Backend> AtariGen<B> {
    pub fn new(
        evo_conf: EvoConfig,
        net_conf: NetConfig,
        obs_shape: [usize; 3],
        action_shape: usize,
        device: &B::Device,
    ) -> AtariResult<Self> {
        evo_conf.validate()?;
        net_conf.validate()?;
        Ok(Self {
            evo_conf,
            net_conf,
            obs_shape,
            action_shape,
            device: device.clone(),
            rng: StdRng::from_entropy(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn evo_conf(&self) -> &EvoConfig {
        &self.evo_conf
    }

    fn bounds(&self) -> WeightBounds {
        self.evo_conf.bounds()
    }

    /// Fresh agent with this generation's topology and bounds
    pub fn new_agent(&mut self) -> AtariResult<AtariNet<B>> {
        Ok(AtariNet::new(
            self.obs_shape,
            self.action_shape,
            &self.net_conf,
            self.bounds(),
            &self.device,
        )?
        .with_seed(self.rng.gen()))
    }

    /// Draw `size` distinct agents and return the `n` with the highest
    /// `probs`, best first
    pub fn tournament(&mut self, probs: &[f32], n: usize, size: usize) -> AtariResult<Vec<usize>> {
        let n_agents = self.evo_conf.n_agents;
        if probs.len() < n_agents {
            return Err(AtariError::Evolution(format!(
                "{} selection probabilities for {} agents",
                probs.len(),
                n_agents
            )));
        }
        if n == 0 || n > size || size > n_agents {
            return Err(AtariError::Evolution(format!(
                "cannot pick {} winners from a tournament of {} out of {} agents",
                n, size, n_agents
            )));
        }

        let mut participants = index::sample(&mut self.rng, n_agents, size).into_vec();
        participants.sort_by(|&a, &b| probs[b].total_cmp(&probs[a]));
        participants.truncate(n);
        Ok(participants)
    }

    /// Take every element from either parent with equal probability
    pub fn uniform(&mut self, first: &WeightArray, second: &WeightArray) -> AtariResult<WeightArray> {
        if first.shape() != second.shape() {
            return Err(AtariError::Evolution(format!(
                "cannot cross arrays of shape {:?} and {:?}",
                first.shape(),
                second.shape()
            )));
        }

        let values = first
            .values()
            .iter()
            .zip(second.values())
            .map(|(&a, &b)| if self.rng.gen_bool(0.5) { a } else { b })
            .collect();
        WeightArray::new(first.shape().to_vec(), values)
    }

    /// Redraw every element with probability `p_mut`, uniformly in the
    /// weight bounds
    pub fn mutate(&mut self, array: &WeightArray, p_mut: f64) -> WeightArray {
        let bounds = self.bounds();
        let mut mutated = array.clone();
        for value in mutated.values_mut() {
            if self.rng.gen::<f64>() < p_mut {
                *value = self.rng.gen_range(bounds.minval..bounds.maxval);
            }
        }
        mutated
    }

    /// Mutation rate for offspring of `parents`
    ///
    /// Crossover offspring use the fixed local rate. Single-parent offspring
    /// average the population diversity component with their parent's
    /// fitness component.
    pub fn calc_p_mut(&self, parents: &[usize], p_mut_div: f64, p_mut_fit: &[f64]) -> AtariResult<f64> {
        match parents {
            [_, _] => Ok(self.evo_conf.p_mut_loc),
            [parent] => p_mut_fit
                .get(*parent)
                .map(|fit| (fit + p_mut_div) / 2.0)
                .ok_or_else(|| {
                    AtariError::Evolution(format!("no fitness mutation rate for agent {}", parent))
                }),
            _ => Err(AtariError::Evolution(format!(
                "offspring need one or two parents, got {}",
                parents.len()
            ))),
        }
    }

    /// Build one mutated offspring of `parents`
    pub fn create_offspring(
        &mut self,
        agents: &[AtariNet<B>],
        parents: &[usize],
        p_mut: f64,
    ) -> AtariResult<AtariNet<B>> {
        let parent_weights = parents
            .iter()
            .map(|&parent| {
                agents
                    .get(parent)
                    .ok_or_else(|| AtariError::Evolution(format!("no agent {}", parent)))?
                    .get_weights()
            })
            .collect::<AtariResult<Vec<WeightSet>>>()?;

        let arrays = match parent_weights.as_slice() {
            [first, second] => first
                .iter()
                .zip(second.iter())
                .map(|(a, b)| {
                    let crossed = self.uniform(a, b)?;
                    Ok(self.mutate(&crossed, p_mut))
                })
                .collect::<AtariResult<Vec<_>>>()?,
            [only] => only.iter().map(|a| self.mutate(a, p_mut)).collect(),
            _ => {
                return Err(AtariError::Evolution(format!(
                    "offspring need one or two parents, got {}",
                    parents.len()
                )));
            }
        };

        let mut offspring = self.new_agent()?;
        offspring.set_weights(WeightSet::new(arrays))?;
        Ok(offspring)
    }

    /// Build the next generation from `agents`
    ///
    /// # Arguments
    ///
    /// * `probs` - Selection score of every agent
    /// * `p_c` - Crossover rate
    /// * `p_mut_div` - Diversity component of the mutation rate
    /// * `p_mut_fit` - Fitness component of the mutation rate, per agent
    /// * `tour_size` - Number of agents drawn for each tournament
    /// * `elite` - Index of the agent carried over unchanged
    ///
    /// # Returns
    ///
    /// The new generation, elite first, and the size of the exploration
    /// subpopulation (offspring of a single parent).
    #[allow(clippy::too_many_arguments)]
    pub fn new_gen(
        &mut self,
        agents: &[AtariNet<B>],
        probs: &[f32],
        p_c: f64,
        p_mut_div: f64,
        p_mut_fit: &[f64],
        tour_size: usize,
        elite: usize,
    ) -> AtariResult<(Vec<AtariNet<B>>, usize)> {
        let elite_agent = agents
            .get(elite)
            .ok_or_else(|| AtariError::Evolution(format!("no elite agent {}", elite)))?;
        if !(0.0..=1.0).contains(&p_c) {
            return Err(AtariError::Evolution(format!(
                "crossover rate must be a probability, got {}",
                p_c
            )));
        }

        let mut new_agents = Vec::with_capacity(agents.len());
        let mut carried = self.new_agent()?;
        carried.set_weights(elite_agent.get_weights()?)?;
        new_agents.push(carried);

        let mut exploration_size = 0;
        for _ in 1..agents.len() {
            let n_parents = if self.rng.gen_bool(p_c) { 2 } else { 1 };
            if n_parents == 1 {
                exploration_size += 1;
            }
            let parents = self.tournament(probs, n_parents, tour_size)?;
            let p_mut = self.calc_p_mut(&parents, p_mut_div, p_mut_fit)?;
            new_agents.push(self.create_offspring(agents, &parents, p_mut)?);
        }

        debug!(
            "new generation of {} agents, {} in the exploration subpopulation",
            new_agents.len(),
            exploration_size
        );
        Ok((new_agents, exploration_size))
    }
}

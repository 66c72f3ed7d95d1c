use crate::data::{Score, SessionId};
use crate::solver::operators::{
  is_permutation, ordered_crossover, random_permutation, shuffle_indexes,
};
use crate::solver::Problem;
use itertools::Itertools;
use log::{debug, info, trace};
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::{Duration, Instant};

pub struct Config {
  pub population_size: usize,
  pub generations: usize,
  /// Chance that a pair of offspring is recombined.
  pub crossover_probability: f64,
  /// Chance that an offspring is mutated at all.
  pub mutation_probability: f64,
  /// Chance that a single position of a mutated offspring is swapped.
  pub gene_mutation_probability: f64,
  pub tournament_size: usize,
  pub seed: u64,
  pub timeout: Option<Duration>,
  /// Stop as soon as an ordering places every session.
  pub stop_when_feasible: bool,
}

impl Default for Config {
  fn default() -> Self {
    return Config {
      population_size: 200,
      generations: 150,
      crossover_probability: 0.7,
      mutation_probability: 0.2,
      gene_mutation_probability: 0.05,
      tournament_size: 3,
      seed: rand::random(),
      timeout: None,
      stop_when_feasible: false,
    };
  }
}

/// A session ordering and its cached fitness (`None` until evaluated).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
  pub order: Vec<SessionId>,
  pub fitness: Option<Score>,
}

impl Genome {
  pub fn new(order: Vec<SessionId>) -> Self {
    return Genome {
      order: order,
      fitness: None,
    };
  }

  pub fn score(&self) -> Score {
    return self.fitness.unwrap_or(Score::min_value());
  }
}

/// Evolves session orderings and returns the best one seen in any generation.
pub fn find_solution(problem: &Problem, config: &Config) -> Genome {
  let mut rng = rand_chacha::ChaChaRng::seed_from_u64(config.seed);
  let n_sessions = problem.n_sessions();
  let target = problem.max_score();
  let population_size = config.population_size.max(1);

  info!(
    "Starting search over {} sessions and {} cells (population {}, generations {}, seed {})",
    n_sessions,
    problem.grid().len(),
    population_size,
    config.generations,
    config.seed
  );

  let mut population: Vec<Genome> = (0..population_size)
    .map(|_| Genome::new(random_permutation(n_sessions, &mut rng)))
    .collect();
  evaluate_population(problem, &mut population);

  let mut best = fittest(&population).clone();
  debug!("Initial best {} of {}", best.score(), target);

  let start = Instant::now();
  let mut generation = 0;
  while generation < config.generations {
    if config.stop_when_feasible && best.score() >= target {
      info!("Stopping with a feasible ordering (generation {})", generation);
      break;
    }
    if let Some(timeout) = config.timeout {
      if Instant::now().duration_since(start) >= timeout {
        info!(
          "Stopping due to timeout at {} (generation {})",
          best.score(),
          generation
        );
        break;
      }
    }

    let mut offspring: Vec<Genome> = (0..population_size)
      .map(|_| select(&population, config.tournament_size, &mut rng).clone())
      .collect();

    for pair in offspring.chunks_exact_mut(2) {
      if rng.gen::<f64>() < config.crossover_probability {
        let (first, second) = ordered_crossover(&pair[0].order, &pair[1].order, &mut rng);
        pair[0] = Genome::new(first);
        pair[1] = Genome::new(second);
      }
    }

    for genome in offspring.iter_mut() {
      if rng.gen::<f64>() < config.mutation_probability {
        shuffle_indexes(
          &mut genome.order,
          config.gene_mutation_probability,
          &mut rng,
        );
        genome.fitness = None;
      }
    }

    debug_assert!(offspring.iter().all(|genome| is_permutation(&genome.order)));

    evaluate_population(problem, &mut offspring);
    population = offspring;

    let candidate = fittest(&population);
    if candidate.score() > best.score() {
      best = candidate.clone();
      debug!(
        "Improved best to {} of {} (generation {})",
        best.score(),
        target,
        generation
      );
    }

    if log::log_enabled!(log::Level::Trace) {
      log_generation(generation, &population);
    }

    generation += 1;
  }

  info!(
    "Finished at {} of {} after {} generations",
    best.score(),
    target,
    generation
  );

  return best;
}

/// Tournament selection with replacement.
fn select<'p, R: Rng>(
  population: &'p [Genome],
  tournament_size: usize,
  rng: &mut R,
) -> &'p Genome {
  let mut winner = &population[rng.gen_range(0, population.len())];
  for _ in 1..tournament_size {
    let aspirant = &population[rng.gen_range(0, population.len())];
    if aspirant.score() > winner.score() {
      winner = aspirant;
    }
  }

  return winner;
}

fn fittest(population: &[Genome]) -> &Genome {
  // Callers never pass an empty population
  return population.iter().fold(&population[0], |best, genome| {
    if genome.score() > best.score() {
      genome
    } else {
      best
    }
  });
}

/// Scores every genome without a cached fitness. Evaluations share nothing
/// mutable, so they run in parallel.
fn evaluate_population(problem: &Problem, population: &mut [Genome]) {
  population
    .par_iter_mut()
    .filter(|genome| genome.fitness.is_none())
    .for_each(|genome| {
      genome.fitness = Some(problem.evaluate(&genome.order));
    });
}

fn log_generation(generation: usize, population: &[Genome]) {
  let scores = population.iter().map(Genome::score);
  let mean = scores.clone().sum::<Score>() as f64 / population.len() as f64;

  if let Some((min, max)) = scores.minmax().into_option() {
    trace!(
      "generation={} min={} mean={:.1} max={}",
      generation,
      min,
      mean,
      max
    );
  }
}

#[macro_use]
extern crate log;

use clap::{App, Arg};
use std::fs;
use std::process;
use std::time::Duration;
use timetabler::data::Outcome;
use timetabler::parser::parse_instance;
use timetabler::solver::{generate_schedule, genetic, print_schedule, verify_schedule};

fn main() {
  env_logger::init();

  let matches = App::new("timetabler")
    .version("1.0")
    .about("Genetic search for a weekly teaching timetable")
    .arg(
      Arg::with_name("instance")
        .long("instance")
        .help("Instance file name")
        .takes_value(true)
        .required(true),
    )
    .arg(
      Arg::with_name("seed")
        .long("seed")
        .help("Seed for rng (random if omitted)")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("population")
        .long("population")
        .help("Number of orderings per generation")
        .takes_value(true)
        .default_value("200"),
    )
    .arg(
      Arg::with_name("generations")
        .long("generations")
        .help("Number of generations to evolve")
        .takes_value(true)
        .default_value("150"),
    )
    .arg(
      Arg::with_name("crossover-probability")
        .long("crossover-probability")
        .help("Probability of recombining a pair of offspring")
        .takes_value(true)
        .default_value("0.7"),
    )
    .arg(
      Arg::with_name("mutation-probability")
        .long("mutation-probability")
        .help("Probability of mutating an offspring")
        .takes_value(true)
        .default_value("0.2"),
    )
    .arg(
      Arg::with_name("gene-mutation-probability")
        .long("gene-mutation-probability")
        .help("Probability of swapping each position of a mutated offspring")
        .takes_value(true)
        .default_value("0.05"),
    )
    .arg(
      Arg::with_name("tournament-size")
        .long("tournament-size")
        .help("Number of aspirants per selection tournament")
        .takes_value(true)
        .default_value("3"),
    )
    .arg(
      Arg::with_name("timeout")
        .long("timeout")
        .help("Timeout (in s) after which to abort the search")
        .takes_value(true),
    )
    .arg(
      Arg::with_name("stop-when-feasible")
        .long("stop-when-feasible")
        .help("Stop as soon as every session has been placed"),
    )
    .get_matches();

  let file = matches.value_of("instance").expect("Missing instance file");
  let seed: u64 = matches
    .value_of("seed")
    .map(|m| m.parse().expect("Invalid seed"))
    .unwrap_or_else(|| rand::random());
  let timeout = matches.value_of("timeout").map(|m| {
    Duration::from_secs(m.parse().expect("Invalid timeout"))
  });

  let config = genetic::Config {
    population_size: parse_value(&matches, "population"),
    generations: parse_value(&matches, "generations"),
    crossover_probability: parse_value(&matches, "crossover-probability"),
    mutation_probability: parse_value(&matches, "mutation-probability"),
    gene_mutation_probability: parse_value(&matches, "gene-mutation-probability"),
    tournament_size: parse_value(&matches, "tournament-size"),
    seed: seed,
    timeout: timeout,
    stop_when_feasible: matches.is_present("stop-when-feasible"),
  };

  let contents = fs::read_to_string(file).expect("Error reading file");
  let instance = parse_instance(&contents).expect("Error parsing file");
  if instance.sessions.is_empty() {
    warn!("No sessions to schedule in {}", file);
  }
  info!(
    "Read {} sessions, {} constraints, {} slots over {} days",
    instance.sessions.len(),
    instance.constraints.len(),
    instance.slots.len(),
    instance.days.len()
  );

  match generate_schedule(&instance, &config) {
    Outcome::Scheduled(schedule) => {
      verify_schedule(&instance, &schedule).expect("Verification failed");
      print_schedule(&schedule);
    }
    Outcome::Infeasible { best, required } => {
      eprintln!(
        "Could not generate a valid schedule (best score {} of {}); relax constraints or add slots",
        best, required
      );
      process::exit(1);
    }
  }
}

fn parse_value<T: std::str::FromStr>(matches: &clap::ArgMatches, name: &str) -> T {
  return matches
    .value_of(name)
    .and_then(|m| m.parse().ok())
    .unwrap_or_else(|| panic!("Invalid {}", name));
}

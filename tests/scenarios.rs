use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use std::collections::HashSet;
use timetabler::data::{Constraint, Instance, Outcome, Session};
use timetabler::parser::parse_instance;
use timetabler::solver::genetic::Config;
use timetabler::solver::operators::random_permutation;
use timetabler::solver::{generate_schedule, verify_schedule, Problem};
use timetabler::time::parse_time;

fn config(seed: u64) -> Config {
  return Config {
    population_size: 40,
    generations: 30,
    seed: seed,
    ..Config::default()
  };
}

fn session(subject: &str, professor: &str, duration: usize) -> Session {
  return Session {
    subject: subject.to_string(),
    professor: professor.to_string(),
    duration: duration,
  };
}

fn strings(items: &[&str]) -> Vec<String> {
  return items.iter().map(|s| s.to_string()).collect();
}

#[test]
fn three_lectures_fill_three_slots() {
  let inst = Instance {
    sessions: vec![
      session("Algebra", "Sen", 1),
      session("Physics", "Das", 1),
      session("History", "Roy", 1),
    ],
    constraints: Vec::new(),
    slots: strings(&["09:00-10:00", "10:00-11:00", "11:00-12:00"]),
    days: strings(&["Monday"]),
  };

  let schedule = match generate_schedule(&inst, &config(1)) {
    Outcome::Scheduled(schedule) => schedule,
    other => panic!("expected a schedule, got {:?}", other),
  };

  assert_eq!(schedule.len(), 3);
  let slots: HashSet<&str> = schedule.iter().map(|e| e.slot.as_str()).collect();
  assert_eq!(slots.len(), 3);
  verify_schedule(&inst, &schedule).expect("valid schedule");
}

#[test]
fn lab_takes_two_adjacent_slots() {
  let inst = Instance {
    sessions: vec![session("Physics Lab", "Das", 2)],
    constraints: Vec::new(),
    slots: strings(&["09:00-10:00", "10:00-11:00", "11:00-12:00"]),
    days: strings(&["Monday"]),
  };

  let outcome = generate_schedule(&inst, &config(2));
  let schedule = outcome.schedule().expect("feasible");

  assert_eq!(schedule.len(), 2);
  assert_eq!(schedule[0].subject, schedule[1].subject);
  assert_eq!(schedule[0].professor, schedule[1].professor);
  assert_eq!(schedule[0].slot, "09:00-10:00");
  assert_eq!(schedule[1].slot, "10:00-11:00");
  verify_schedule(&inst, schedule).expect("valid schedule");
}

#[test]
fn two_lectures_for_one_slot_are_infeasible() {
  let inst = Instance {
    sessions: vec![session("Algebra", "Sen", 1), session("Geometry", "Sen", 1)],
    constraints: Vec::new(),
    slots: strings(&["09:00-10:00"]),
    days: strings(&["Monday"]),
  };

  assert_eq!(
    generate_schedule(&inst, &config(3)),
    Outcome::Infeasible {
      best: -90,
      required: 20
    }
  );
}

#[test]
fn blocked_only_slot_is_infeasible() {
  let inst = Instance {
    sessions: vec![session("Algebra", "P", 1)],
    constraints: vec![Constraint {
      professor: "P".to_string(),
      day: "Monday".to_string(),
      start: parse_time("09:00"),
      end: parse_time("10:00"),
    }],
    slots: strings(&["09:00-10:00"]),
    days: strings(&["Monday"]),
  };

  assert!(!generate_schedule(&inst, &config(4)).is_feasible());
}

#[test]
fn no_slots_is_infeasible() {
  let inst = Instance {
    sessions: vec![session("Algebra", "Sen", 1)],
    constraints: Vec::new(),
    slots: Vec::new(),
    days: strings(&["Monday", "Tuesday"]),
  };

  assert!(!generate_schedule(&inst, &config(5)).is_feasible());
}

#[test]
fn no_sessions_is_an_empty_schedule() {
  let inst = Instance {
    sessions: Vec::new(),
    constraints: Vec::new(),
    slots: strings(&["09:00-10:00"]),
    days: strings(&["Monday"]),
  };

  assert_eq!(
    generate_schedule(&inst, &config(6)),
    Outcome::Scheduled(Vec::new())
  );
}

fn random_instance<R: Rng>(rng: &mut R) -> Instance {
  let professors = ["Rao", "Iyer", "Mehta", "Sen", "Das"];
  let days = strings(&["Monday", "Tuesday", "Wednesday"]);
  let slots = strings(&[
    "09:00-10:00",
    "10:00-11:00",
    "11:00-12:00",
    "13:00-14:00",
    "14:00-15:00",
  ]);

  let sessions = (0..rng.gen_range(1, 14))
    .map(|i| {
      let professor = professors.choose(rng).expect("professors");
      session(&format!("Subject {}", i), professor, rng.gen_range(1, 3))
    })
    .collect();

  let constraints = (0..rng.gen_range(0, 6))
    .map(|_| {
      let start = rng.gen_range(8, 15) * 60;
      Constraint {
        professor: professors.choose(rng).expect("professors").to_string(),
        day: days.choose(rng).expect("days").clone(),
        start: start,
        end: start + rng.gen_range(1, 4) * 30,
      }
    })
    .collect();

  return Instance {
    sessions: sessions,
    constraints: constraints,
    slots: slots,
    days: days,
  };
}

#[test]
fn full_score_always_decodes_to_a_valid_schedule() {
  let mut rng = ChaChaRng::seed_from_u64(2024);

  for _ in 0..200 {
    let inst = random_instance(&mut rng);
    let problem = Problem::new(&inst);
    let order = random_permutation(inst.n_sessions(), &mut rng);

    let score = problem.evaluate(&order);
    match problem.decode(&order) {
      Some(schedule) => {
        assert_eq!(score, problem.max_score());
        verify_schedule(&inst, &schedule).expect("valid schedule");
      }
      None => assert!(score < problem.max_score()),
    }
  }
}

#[test]
fn decoding_is_idempotent() {
  let mut rng = ChaChaRng::seed_from_u64(77);

  for _ in 0..50 {
    let inst = random_instance(&mut rng);
    let order = random_permutation(inst.n_sessions(), &mut rng);

    let first = Problem::new(&inst).decode(&order);
    let second = Problem::new(&inst).decode(&order);
    assert_eq!(first, second);
  }
}

#[test]
fn sample_week_is_scheduled() {
  let inst = parse_instance(include_str!("../instances/week.txt")).expect("parses");
  assert_eq!(inst.slots.len(), 6);
  assert_eq!(inst.sessions.len(), 18);

  let cfg = Config {
    stop_when_feasible: true,
    ..config(11)
  };
  let schedule = match generate_schedule(&inst, &cfg) {
    Outcome::Scheduled(schedule) => schedule,
    other => panic!("expected a schedule, got {:?}", other),
  };

  // 3 two-slot sessions
  assert_eq!(schedule.len(), 21);
  verify_schedule(&inst, &schedule).expect("valid schedule");
}

#[test]
fn repeated_slot_lines_are_scheduled_once() {
  let inst = parse_instance(
    "days: Monday\nslots: 09:00-10:00, 10:00-11:00, 09:00-10:00\nlecture: OS (Iyer)\nlecture: CN (Mehta)",
  )
  .expect("parses");
  assert_eq!(inst.slots, vec!["09:00-10:00", "10:00-11:00"]);

  let schedule = match generate_schedule(&inst, &config(12)) {
    Outcome::Scheduled(schedule) => schedule,
    other => panic!("expected a schedule, got {:?}", other),
  };
  verify_schedule(&inst, &schedule).expect("valid schedule");
}

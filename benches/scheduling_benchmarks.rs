//! Performance benchmarks for the scheduling engine.
//!
//! Covers the hot paths of a staff session:
//! - Creating a single validated shift
//! - Listing a week's shifts as a team member, as the week grows
//! - Releasing a training seat with a long waitlist
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::{NaiveDate, NaiveDateTime};
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use uuid::Uuid;

use makerspace_scheduler::clock::FixedClock;
use makerspace_scheduler::config::ConfigLoader;
use makerspace_scheduler::engine::Scheduler;
use makerspace_scheduler::models::{Location, Profile, Role, ShiftDraft, TrainingDraft};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn at(hour: u32) -> NaiveDateTime {
    monday().and_hms_opt(hour, 0, 0).unwrap()
}

/// Builds a scheduler from the default config with a registered staff member.
fn create_scheduler() -> (Scheduler, Uuid) {
    let loader = ConfigLoader::load("./config/default").expect("Failed to load config");
    let scheduler = Scheduler::from_config(loader.config())
        .expect("Failed to build scheduler")
        .with_clock(FixedClock::new(NaiveDate::from_ymd_opt(2026, 10, 12).unwrap().and_hms_opt(8, 0, 0).unwrap()));
    let staff = scheduler
        .register_profile(Profile::new("staff", Role::Staff))
        .unwrap();
    (scheduler, staff.id)
}

/// Fills Monday with one shift per team member and returns the last member.
fn populate_week(scheduler: &Scheduler, staff: Uuid, members: usize) -> Uuid {
    let mut last = staff;
    for i in 0..members {
        let member = scheduler
            .register_profile(Profile::new(format!("member{:03}", i), Role::TeamMember))
            .unwrap();
        let draft = ShiftDraft::new("Shop floor", Location::ThirdProtoShop, at(9), at(13))
            .assigned_to(member.id);
        scheduler.create_shift(staff, monday(), draft).unwrap();
        last = member.id;
    }
    scheduler.publish_week(staff, monday()).unwrap();
    last
}

/// Benchmark: create one shift against a fresh week.
fn bench_create_shift(c: &mut Criterion) {
    c.bench_function("create_shift", |b| {
        b.iter_batched(
            || {
                let (scheduler, staff) = create_scheduler();
                let member = scheduler
                    .register_profile(Profile::new("alee", Role::TeamMember))
                    .unwrap();
                (scheduler, staff, member.id)
            },
            |(scheduler, staff, member)| {
                let draft = ShiftDraft::new("Shop floor", Location::ThirdProtoShop, at(9), at(13))
                    .assigned_to(member);
                black_box(scheduler.create_shift(staff, monday(), draft).unwrap())
            },
            BatchSize::SmallInput,
        )
    });
}

/// Benchmark: member view of a published week, scaling with its size.
fn bench_week_shifts_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("week_shifts_scaling");

    for members in [10_usize, 50, 200].iter() {
        let (scheduler, staff) = create_scheduler();
        let viewer = populate_week(&scheduler, staff, *members);

        group.throughput(Throughput::Elements(*members as u64));
        group.bench_with_input(BenchmarkId::from_parameter(members), members, |b, _| {
            b.iter(|| black_box(scheduler.week_shifts(viewer, monday()).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark: cancelling a booking invites the head of a waitlist.
fn bench_release_with_waitlist(c: &mut Criterion) {
    let mut group = c.benchmark_group("release_with_waitlist");

    for waiting in [10_usize, 100].iter() {
        group.throughput(Throughput::Elements(*waiting as u64));
        group.bench_with_input(BenchmarkId::from_parameter(waiting), waiting, |b, &waiting| {
            b.iter_batched(
                || {
                    let (scheduler, staff) = create_scheduler();
                    let training = scheduler
                        .create_training(staff, TrainingDraft::new("Laser intro", "Epilog", 1))
                        .unwrap()
                        .value;
                    let holder = scheduler
                        .register_profile(Profile::new("holder", Role::Student))
                        .unwrap();
                    scheduler.sign_up(holder.id, training.id).unwrap();
                    for i in 0..waiting {
                        let student = scheduler
                            .register_profile(Profile::new(format!("student{:03}", i), Role::Student))
                            .unwrap();
                        scheduler.join_waitlist(student.id, training.id).unwrap();
                    }
                    (scheduler, holder.id, training.id)
                },
                |(scheduler, holder, training)| {
                    black_box(scheduler.cancel_training(holder, training, None).unwrap())
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_create_shift,
    bench_week_shifts_scaling,
    bench_release_with_waitlist,
);
criterion_main!(benches);

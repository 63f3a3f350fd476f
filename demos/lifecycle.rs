//! The supporting cast: dispatcher, state machine, timers, registry

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use esox_poolkit::{Dispatcher, Registry, State, StateMachine, Timers, Transition, UnitNumber};

struct ScoreChanged(i64);

fn main() {
    println!("=== EsoxSolutions.PoolKit - Lifecycle Examples ===\n");

    dispatch();
    machine();
    timers();
    registry();
}

fn dispatch() {
    println!("1. Dispatcher:");
    let mut dispatcher = Dispatcher::new();
    let topic = dispatcher.topic::<ScoreChanged>().unwrap();

    let _sub = topic
        .subscribe(|msg| println!("   score is now {}", UnitNumber(msg.0)))
        .unwrap();

    dispatcher.post(&ScoreChanged(950)).unwrap();
    dispatcher.post(&ScoreChanged(1_250_000)).unwrap();
    println!();
}

struct Game {
    frames: u32,
}

struct Loading;
impl State<Game> for Loading {
    fn on_start(&mut self, _game: &mut Game) {
        println!("   loading...");
    }

    fn on_update(&mut self, game: &mut Game) -> Transition {
        game.frames += 1;
        if game.frames >= 2 {
            Transition::to::<Playing>()
        } else {
            Transition::stay()
        }
    }
}

struct Playing;
impl State<Game> for Playing {
    fn on_start(&mut self, game: &mut Game) {
        println!("   playing after {} frames", game.frames);
    }
}

fn machine() {
    println!("2. State Machine:");
    let mut machine = StateMachine::new(Game { frames: 0 });
    machine.add_state(Loading).add_state(Playing);

    machine.start().unwrap();
    for _ in 0..3 {
        machine.update().unwrap();
    }
    println!();
}

fn timers() {
    println!("3. Timers:");
    let mut timers = Timers::new();
    let beats = Rc::new(Cell::new(0u32));

    let sink = Rc::clone(&beats);
    timers.interval(Duration::from_millis(100), move || {
        sink.set(sink.get() + 1);
    });
    timers.delay(Duration::from_millis(250), || println!("   delayed hello"));

    for _ in 0..5 {
        timers.tick(Duration::from_millis(60));
    }
    println!("   interval fired {} times\n", beats.get());
}

struct Audio {
    volume: u8,
}

fn registry() {
    println!("4. Registry:");
    let registry = Registry::new();
    registry.install(Audio { volume: 80 }).unwrap();

    let audio = registry.get::<Audio>().unwrap();
    println!("   audio volume: {}", audio.volume);

    registry.teardown();
    println!("   after teardown: {:?}", registry.get::<Audio>().map(|a| a.volume));
}

use std::collections::{HashSet, VecDeque};

use mazeback::generator::{GrowingTree, Phase, Policy, Selector};
use mazeback::maze::{Coord, Direction, Face, Maze};

/// Wall presence over every (cell, direction) face in a canonical order.
fn wall_snapshot(maze: &Maze) -> Vec<bool> {
    maze.cells()
        .flat_map(|cell| {
            Direction::all(maze.dimension_count())
                .map(move |direction| maze.has_wall(&Face::new(cell.clone(), direction)))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Everything a caller can observe about an engine.
#[derive(Debug, PartialEq)]
struct Snapshot {
    phase: Phase,
    steps: usize,
    remaining: usize,
    active: Vec<Coord>,
    completed: Vec<Coord>,
    entrance: Option<Coord>,
    exit: Option<Coord>,
    walls: Vec<bool>,
}

fn snapshot(engine: &GrowingTree) -> Snapshot {
    Snapshot {
        phase: engine.phase(),
        steps: engine.steps_taken(),
        remaining: engine.remaining_cells(),
        active: engine.active_cells().to_vec(),
        completed: engine.completed_cells().to_vec(),
        entrance: engine.entrance().cloned(),
        exit: engine.exit().cloned(),
        walls: wall_snapshot(engine.maze()),
    }
}

fn run_to_finish(engine: &mut GrowingTree) -> usize {
    let cap = 2 * engine.maze().size() + 2;
    let mut steps = 0;
    while !engine.is_finished() {
        engine.advance();
        steps += 1;
        assert!(steps <= cap, "generation did not terminate within {cap} steps");
    }
    steps
}

fn open_internal_faces(maze: &Maze) -> usize {
    let mut count = 0;
    for cell in maze.cells() {
        for direction in Direction::all(maze.dimension_count()) {
            if !direction.sign.is_positive() {
                continue;
            }
            let in_grid = cell
                .offset(direction)
                .is_some_and(|neighbor| maze.is_in_bounds(&neighbor));
            if in_grid && !maze.has_wall(&Face::new(cell.clone(), direction)) {
                count += 1;
            }
        }
    }
    count
}

fn open_external_faces(maze: &Maze) -> Vec<Face> {
    let mut faces = Vec::new();
    for cell in maze.cells() {
        for direction in Direction::all(maze.dimension_count()) {
            let leaves_grid = match cell.offset(direction) {
                Some(neighbor) => !maze.is_in_bounds(&neighbor),
                None => true,
            };
            if leaves_grid && !maze.has_wall(&Face::new(cell.clone(), direction)) {
                faces.push(Face::new(cell.clone(), direction));
            }
        }
    }
    faces
}

#[test]
fn deterministic_for_fixed_seed_and_shape() {
    let mut first = GrowingTree::new(&[5, 4], Selector::default(), 2024).unwrap();
    let mut second = GrowingTree::new(&[5, 4], Selector::default(), 2024).unwrap();
    while !first.is_finished() {
        first.advance();
        second.advance();
        assert_eq!(snapshot(&first), snapshot(&second));
    }
}

#[test]
fn different_seeds_usually_differ() {
    let mut first = GrowingTree::new(&[6, 6], Selector::default(), 1).unwrap();
    let mut second = GrowingTree::new(&[6, 6], Selector::default(), 2).unwrap();
    run_to_finish(&mut first);
    run_to_finish(&mut second);
    assert_ne!(
        wall_snapshot(first.maze()),
        wall_snapshot(second.maze()),
        "two seeds out of 2^64 colliding on a 6x6 maze means the seed is ignored"
    );
}

#[test]
fn n_forward_n_reverse_restores_initial_state() {
    let total_steps = {
        let mut probe = GrowingTree::new(&[4, 3], Selector::default(), 77).unwrap();
        run_to_finish(&mut probe)
    };
    for n in 0..=total_steps {
        let mut engine = GrowingTree::new(&[4, 3], Selector::default(), 77).unwrap();
        let initial = snapshot(&engine);
        for _ in 0..n {
            engine.advance();
        }
        for _ in 0..n {
            engine.reverse();
        }
        assert_eq!(snapshot(&engine), initial, "round trip of {n} steps");
    }
}

#[test]
fn reverse_restores_every_intermediate_state() {
    let mut engine = GrowingTree::new(&[3, 3], Selector::default(), 13).unwrap();
    let mut history = vec![snapshot(&engine)];
    while !engine.is_finished() {
        engine.advance();
        history.push(snapshot(&engine));
    }
    while let Some(expected) = history.pop() {
        assert_eq!(snapshot(&engine), expected);
        engine.reverse();
    }
}

#[test]
fn random_stream_position_survives_a_round_trip() {
    // After stepping backward, the engine must replay the exact same
    // mutations a twin engine produces on its first pass.
    let mut engine = GrowingTree::new(&[4, 4], Selector::default(), 31).unwrap();
    let mut twin = GrowingTree::new(&[4, 4], Selector::default(), 31).unwrap();
    for _ in 0..7 {
        engine.advance();
    }
    for _ in 0..4 {
        engine.reverse();
    }
    run_to_finish(&mut engine);
    run_to_finish(&mut twin);
    assert_eq!(snapshot(&engine), snapshot(&twin));
}

#[test]
fn reset_returns_to_the_initial_state_and_replays() {
    let mut engine = GrowingTree::new(&[3, 4], Selector::default(), 55).unwrap();
    let initial = snapshot(&engine);
    let mut twin = GrowingTree::new(&[3, 4], Selector::default(), 55).unwrap();
    run_to_finish(&mut engine);
    engine.reset();
    assert_eq!(snapshot(&engine), initial);
    run_to_finish(&mut engine);
    run_to_finish(&mut twin);
    assert_eq!(snapshot(&engine), snapshot(&twin));
}

#[test]
fn terminates_within_bound_and_empties_remaining_once() {
    let mut engine = GrowingTree::new(&[4, 3, 2], Selector::default(), 5).unwrap();
    let size = engine.maze().size();
    let mut reached_zero = 0;
    let mut previous = engine.remaining_cells();
    let mut steps = 0;
    while !engine.is_finished() {
        engine.advance();
        steps += 1;
        assert!(steps <= 2 * size + 2);
        if previous != 0 && engine.remaining_cells() == 0 {
            reached_zero += 1;
            assert_eq!(engine.phase(), Phase::PlaceEntranceAndExit);
        }
        previous = engine.remaining_cells();
    }
    assert_eq!(reached_zero, 1);
    // Advancing a finished engine is a no-op.
    let finished = snapshot(&engine);
    engine.advance();
    assert_eq!(snapshot(&engine), finished);
}

#[test]
fn finished_maze_is_a_spanning_tree() {
    for seed in [0, 1, 17, 400] {
        let mut engine = GrowingTree::new(&[5, 4], Selector::default(), seed).unwrap();
        run_to_finish(&mut engine);
        let maze = engine.maze();
        assert_eq!(
            open_internal_faces(maze),
            maze.size() - 1,
            "seed {seed}: open passage count of a spanning tree"
        );

        // Every cell reachable through open passages.
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([Coord::origin(2)]);
        visited.insert(Coord::origin(2));
        while let Some(cell) = queue.pop_front() {
            for direction in Direction::all(2) {
                if maze.has_wall(&Face::new(cell.clone(), direction)) {
                    continue;
                }
                let Some(neighbor) = cell.offset(direction) else {
                    continue;
                };
                if maze.is_in_bounds(&neighbor) && visited.insert(neighbor.clone()) {
                    queue.push_back(neighbor);
                }
            }
        }
        assert_eq!(visited.len(), maze.size(), "seed {seed}: connectivity");
    }
}

#[test]
fn exactly_one_entrance_and_one_exit() {
    for seed in [3, 9, 1001] {
        let mut engine = GrowingTree::new(&[6, 3], Selector::default(), seed).unwrap();
        run_to_finish(&mut engine);
        let open = open_external_faces(engine.maze());
        assert_eq!(open.len(), 2, "seed {seed}");
        assert_ne!(open[0].cell, open[1].cell, "seed {seed}: distinct cells");
        let entrance = engine.entrance().unwrap();
        let exit = engine.exit().unwrap();
        assert!(engine.maze().is_edge_cell(entrance));
        assert!(engine.maze().is_edge_cell(exit));
        assert_ne!(entrance, exit);
    }
}

#[test]
fn two_by_two_backtracker_scenario() {
    let mut engine = GrowingTree::new(&[2, 2], Selector::recursive_backtracker(), 12345).unwrap();
    run_to_finish(&mut engine);
    assert_eq!(open_internal_faces(engine.maze()), 3);
    assert_eq!(engine.visited_count(), 4);
    assert_eq!(engine.remaining_cells(), 0);
    assert_eq!(open_external_faces(engine.maze()).len(), 2);
    assert_eq!(engine.phase().to_string(), "finished");
}

#[test]
fn reversing_a_completion_restores_active_ordering() {
    // Walk forward until a cell gets completed, then undo that one step:
    // the replayed selection must reinsert the cell at the exact slot it
    // was taken from, ordering included, even though the selector consumes
    // draws.
    let mut engine = GrowingTree::new(&[4, 3], Selector::default(), 77).unwrap();
    let mut completions = 0;
    while !engine.is_finished() {
        let before = snapshot(&engine);
        let completed_before = engine.completed_cells().len();
        engine.advance();
        if engine.completed_cells().len() > completed_before {
            completions += 1;
            engine.reverse();
            assert_eq!(snapshot(&engine), before);
            engine.advance();
        }
    }
    assert!(completions > 0, "no completion step occurred");
}

#[test]
fn multi_selector_full_cycle_round_trips() {
    let selector = Selector::multi(
        vec![Policy::Random, Policy::Last, Policy::First],
        vec![0.3, 0.5, 0.2],
    )
    .unwrap();
    let mut engine = GrowingTree::new(&[4, 4], selector, 99).unwrap();
    let mut history = vec![snapshot(&engine)];
    while !engine.is_finished() {
        engine.advance();
        history.push(snapshot(&engine));
    }
    let maze = engine.maze();
    assert_eq!(open_internal_faces(maze), maze.size() - 1);
    assert_eq!(open_external_faces(maze).len(), 2);
    while let Some(expected) = history.pop() {
        assert_eq!(snapshot(&engine), expected);
        engine.reverse();
    }
}

#[test]
fn higher_dimensional_generation_works() {
    let mut engine = GrowingTree::new(&[3, 3, 3], Selector::recursive_backtracker(), 8).unwrap();
    run_to_finish(&mut engine);
    let maze = engine.maze();
    assert_eq!(open_internal_faces(maze), maze.size() - 1);
    assert_eq!(open_external_faces(maze).len(), 2);
}

#[test]
fn one_dimensional_corridor() {
    let mut engine = GrowingTree::new(&[5], Selector::default(), 21).unwrap();
    run_to_finish(&mut engine);
    let maze = engine.maze();
    assert_eq!(open_internal_faces(maze), 4);
    assert_eq!(open_external_faces(maze).len(), 2);
}

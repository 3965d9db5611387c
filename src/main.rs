use rand::Rng;

use mazeback::{
    app::App,
    generator::{GrowingTree, Selector},
};

/// Algorithm menu entries. All are growing-tree variants differing only in
/// how the next cell to grow from is selected.
const ALGORITHMS: [(&str, fn() -> Selector); 4] = [
    ("Recursive Backtracker", Selector::recursive_backtracker),
    ("Prim's Algorithm", Selector::prim),
    ("Default blend (50/50 random/newest)", Selector::default),
    ("Uniform random", || {
        Selector::single(mazeback::generator::Policy::Random)
    }),
];

fn main() -> std::io::Result<()> {
    // Log to a file; stdout belongs to the renderer.
    let (writer, _guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        ".",
        "mazeback.log",
    ));
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let mut input = String::new();
    println!("Enter maze shape as space-separated extents (e.g. '20 10', or '5 5 3' for 3D):");
    std::io::stdin().read_line(&mut input)?;

    let shape = input
        .split_whitespace()
        .filter_map(|s| s.parse::<usize>().ok())
        .collect::<Vec<_>>();
    if shape.is_empty() {
        eprintln!("Please enter at least one valid extent.");
        return Ok(());
    }

    println!("Select cell selection algorithm:");
    for (i, (name, _)) in ALGORITHMS.iter().enumerate() {
        println!("{}. {}", i + 1, name);
    }
    input.clear();
    std::io::stdin().read_line(&mut input)?;
    let selector = match input.trim().parse::<usize>() {
        Ok(choice) if (1..=ALGORITHMS.len()).contains(&choice) => ALGORITHMS[choice - 1].1(),
        _ => {
            eprintln!("Invalid selection.");
            return Ok(());
        }
    };

    println!("Enter a seed (blank for a random one):");
    input.clear();
    std::io::stdin().read_line(&mut input)?;
    let seed = match input.trim() {
        "" => rand::rng().random(),
        text => match text.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("Seed must be a non-negative integer.");
                return Ok(());
            }
        },
    };

    let mut engine = match GrowingTree::new(&shape, selector, seed) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("Cannot generate this maze: {err}");
            return Ok(());
        }
    };
    tracing::info!("[main] shape {:?}, seed {}", shape, seed);

    App::default().run(&mut engine)
}

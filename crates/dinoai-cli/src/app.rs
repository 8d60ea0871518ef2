//! Interactive controller front end.
//!
//! The controller is a long-lived process: it owns the population while a
//! browser game session attaches over TCP, so the command surface is a
//! stdin loop rather than one-shot subcommands. Command errors are printed
//! and the loop continues.

use std::{
    fs,
    io::{self, BufRead as _, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;
use dinoai_evolution::{genetic::EvolutionEngine, population::PopulationStore};
use dinoai_session::{GenerationRunner, RunError};

use crate::net::{GameListener, TcpGateway};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Evolves neural-network players for the runner game", long_about = None)]
pub struct CommandArgs {
    /// Port the game session connects to
    #[arg(long, default_value_t = 1234)]
    port: u16,
    /// Directory population snapshots are saved to and loaded from
    #[arg(long, default_value = "genomes")]
    genome_dir: PathBuf,
    /// Genomes per generation
    #[arg(long, default_value_t = 10)]
    population_size: usize,
}

const HELP: &str = "\
Commands:
  n             run one generation against the connected game
  e             evolve the population from the last generation's scores
  info          show generation, population size and learning rate
  print <i>     dump genome i (fitness + network JSON)
  save [name]   save a population snapshot to the genome directory
  load <name>   load a population snapshot from the genome directory
  clone <path>  seed the whole population from one network JSON file
  q             quit";

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let listener = GameListener::bind(args.port)?;

    println!("DINO AI");
    println!("-------");
    println!("Game transport listening on port {}", args.port);
    println!("{HELP}");

    let mut rng = rand::rng();
    let mut app = App::new(args, listener, &mut rng);

    let stdin = io::stdin();
    print_prompt()?;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read command input")?;
        match app.dispatch(&line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => eprintln!("error: {err:#}"),
        }
        print_prompt()?;
    }
    Ok(())
}

fn print_prompt() -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "> ").and_then(|()| stdout.flush()).context("failed to write prompt")
}

struct App {
    args: CommandArgs,
    store: PopulationStore,
    engine: EvolutionEngine,
    generation: u64,
    last_scores: Option<Vec<f64>>,
    listener: GameListener,
    gateway: Option<TcpGateway>,
}

impl App {
    fn new<R>(args: CommandArgs, listener: GameListener, rng: &mut R) -> Self
    where
        R: rand::Rng + ?Sized,
    {
        let store = PopulationStore::initialize(args.population_size, rng);
        Self {
            args,
            store,
            engine: EvolutionEngine::default(),
            generation: 1,
            last_scores: None,
            listener,
            gateway: None,
        }
    }

    /// Executes one command line; returns `false` when the loop should end.
    fn dispatch(&mut self, line: &str) -> anyhow::Result<bool> {
        let mut words = line.split_whitespace();
        match words.next() {
            None => {}
            Some("n") => self.run_generation()?,
            Some("e") => self.evolve()?,
            Some("info") => self.print_info(),
            Some("print") => {
                let index = parse_index(words.next())?;
                self.dump_genome(index)?;
            }
            Some("save") => self.save(words.next())?,
            Some("load") => {
                let name = words.next().context("usage: load <name>")?;
                self.load(name)?;
            }
            Some("clone") => {
                let path = words.next().context("usage: clone <path>")?;
                self.clone_singleton(path)?;
            }
            Some("help" | "h") => println!("{HELP}"),
            Some("q" | "quit") => return Ok(false),
            Some(other) => eprintln!("unknown command: {other} (try 'help')"),
        }
        Ok(true)
    }

    fn run_generation(&mut self) -> anyhow::Result<()> {
        if self.gateway.is_none() {
            eprintln!("Waiting for a game session to connect...");
            let gateway = self.listener.accept()?;
            self.gateway = Some(gateway);
        }
        let Some(gateway) = self.gateway.as_mut() else {
            unreachable!("gateway accepted above");
        };

        let runner = GenerationRunner::new(self.store.genomes(), self.generation);
        match runner.run(gateway) {
            Ok(scores) => {
                self.last_scores = Some(scores);
                Ok(())
            }
            Err(RunError::Gateway(err)) => {
                // stale connection: discard it and re-accept on the next run
                self.gateway = None;
                Err(anyhow::Error::new(err).context("generation aborted, game session lost"))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn evolve(&mut self) -> anyhow::Result<()> {
        let scores = self.last_scores.as_deref().unwrap_or(&[]);
        let next = self
            .engine
            .evolve(self.store.genomes(), scores, &mut rand::rng())?;
        // the score vector is consumed by exactly one evolution
        self.last_scores = None;
        self.store.replace(next);
        self.generation += 1;
        println!("Evolved population; now at generation {}", self.generation);
        Ok(())
    }

    fn print_info(&self) {
        println!("Current information:");
        println!("Generation: {}", self.generation);
        println!("Genomes per generation: {}", self.store.size());
        println!("Learning rate: {}", self.engine.learning_rate);
    }

    fn dump_genome(&self, index: usize) -> anyhow::Result<()> {
        let genome = self.store.get(index)?;
        println!("Genome {index} at generation {}", self.generation);
        println!("Fitness: {}", genome.fitness());
        let json =
            serde_json::to_string(genome.network()).context("failed to encode network")?;
        println!("{json}");
        Ok(())
    }

    fn save(&self, name: Option<&str>) -> anyhow::Result<()> {
        let name = match name {
            Some(name) => name.to_owned(),
            None => format!(
                "gen{}-{}",
                self.generation,
                Utc::now().format("%Y%m%d-%H%M%S")
            ),
        };
        fs::create_dir_all(&self.args.genome_dir).with_context(|| {
            format!(
                "failed to create genome directory {}",
                self.args.genome_dir.display()
            )
        })?;
        let path = self.args.genome_dir.join(format!("{name}.json"));
        let bytes = self.store.export_snapshot()?;
        fs::write(&path, bytes)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        println!("Saved population to {}", path.display());
        Ok(())
    }

    fn load(&mut self, name: &str) -> anyhow::Result<()> {
        let path = self.args.genome_dir.join(format!("{name}.json"));
        let bytes = fs::read(&path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        self.store
            .import_snapshot(&bytes)
            .with_context(|| format!("failed to import snapshot {}", path.display()))?;
        println!("Loaded population from {}", path.display());
        Ok(())
    }

    fn clone_singleton(&mut self, path: &str) -> anyhow::Result<()> {
        let bytes =
            fs::read(path).with_context(|| format!("failed to read network file {path}"))?;
        self.store
            .clone_singleton(&bytes)
            .with_context(|| format!("failed to clone network from {path}"))?;
        println!(
            "Population seeded with {} copies of {path}",
            self.store.size()
        );
        Ok(())
    }
}

fn parse_index(word: Option<&str>) -> anyhow::Result<usize> {
    let word = word.context("usage: print <index>")?;
    word.parse()
        .with_context(|| format!("not a genome index: {word}"))
}

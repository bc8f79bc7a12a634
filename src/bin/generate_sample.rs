use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use log::info;
use parquet::arrow::ArrowWriter;

/// Write a synthetic nitrogen isotherm as CSV and Parquet.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output file stem; `.csv` and `.parquet` are appended.
    #[arg(default_value = "sample_isotherm")]
    output: PathBuf,

    /// Monolayer amount, mol/g.
    #[arg(long, default_value_t = 0.0025)]
    nm: f64,

    /// BET constant.
    #[arg(long, default_value_t = 120.0)]
    c: f64,

    /// Relative standard deviation of the amount adsorbed.
    #[arg(long, default_value_t = 0.002)]
    noise: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Amount adsorbed on an ideal BET surface.
fn bet_amount(relp: f64, nm: f64, c: f64) -> f64 {
    nm * c * relp / ((1.0 - relp) * (1.0 - relp + c * relp))
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    // Dense below p = 0.35, where BET ranges usually sit, sparse above.
    let relp: Vec<f64> = (1..=35)
        .map(|i| i as f64 * 0.01)
        .chain((8..=19).map(|i| i as f64 * 0.05))
        .collect();
    let n: Vec<f64> = relp
        .iter()
        .map(|&p| bet_amount(p, args.nm, args.c) * (1.0 + rng.gauss(0.0, args.noise)))
        .collect();

    let csv_path = args.output.with_extension("csv");
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("creating {}", csv_path.display()))?;
    writer.write_record(["relp", "n"])?;
    for (p, amount) in relp.iter().zip(&n) {
        writer.write_record([p.to_string(), amount.to_string()])?;
    }
    writer.flush()?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("relp", DataType::Float64, false),
        Field::new("n", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(relp.clone())),
            Arc::new(Float64Array::from(n)),
        ],
    )
    .context("building record batch")?;

    let parquet_path = args.output.with_extension("parquet");
    let file = std::fs::File::create(&parquet_path)
        .with_context(|| format!("creating {}", parquet_path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;

    info!("nm = {} mol/g, C = {}", args.nm, args.c);
    println!(
        "Wrote {} isotherm points to {} and {}",
        relp.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}

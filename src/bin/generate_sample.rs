use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::print_batches;
use parquet::arrow::ArrowWriter;

const PLATFORMS: [(&str, i64, i64); 8] = [
    ("2600", 1980, 1989),
    ("PS", 1995, 2003),
    ("PS2", 2000, 2011),
    ("GBA", 2001, 2007),
    ("X360", 2005, 2016),
    ("PS3", 2006, 2016),
    ("Wii", 2006, 2015),
    ("PC", 1990, 2016),
];
const GENRES: [&str; 8] = [
    "Action", "Sports", "Shooter", "Role-Playing", "Racing", "Platform", "Puzzle", "Strategy",
];
const RATINGS: [&str; 5] = ["E", "E10+", "T", "M", "RP"];

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn range(&mut self, low: i64, high: i64) -> i64 {
        low + (self.next_u64() % (high - low + 1) as u64) as i64
    }
}

/// One synthetic game with the blanks and sentinels of the real dataset.
struct Game {
    name: String,
    platform: &'static str,
    year: Option<f64>,
    genre: &'static str,
    critic_score: Option<f64>,
    user_score: Option<String>,
    rating: Option<&'static str>,
}

fn generate_game(id: usize, rng: &mut SimpleRng) -> Game {
    let (platform, first, last) = PLATFORMS[(rng.next_u64() % PLATFORMS.len() as u64) as usize];
    let critic = 40.0 + (rng.next_f64() * 58.0).round();
    // User scores loosely follow critic scores on a 0-10 scale.
    let user = ((critic / 10.0 + (rng.next_f64() - 0.5) * 3.0).clamp(0.0, 10.0) * 10.0).round() / 10.0;

    Game {
        name: format!("Game {id:04}"),
        platform,
        year: (!rng.chance(0.02)).then(|| rng.range(first, last) as f64),
        genre: rng.pick(&GENRES),
        critic_score: (!rng.chance(0.3)).then_some(critic),
        user_score: if rng.chance(0.15) {
            Some("tbd".to_string())
        } else {
            (!rng.chance(0.2)).then(|| format!("{user}"))
        },
        rating: (!rng.chance(0.25)).then(|| rng.pick(&RATINGS)),
    }
}

const HEADERS: [&str; 7] = [
    "Name",
    "Platform",
    "Year_of_Release",
    "Genre",
    "Critic_Score",
    "User_Score",
    "Rating",
];

fn write_csv(path: &str, games: &[Game]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADERS)?;
    for game in games {
        writer.write_record([
            game.name.clone(),
            game.platform.to_string(),
            game.year.map(|y| format!("{y:.1}")).unwrap_or_default(),
            game.genre.to_string(),
            game.critic_score.map(|c| format!("{c:.1}")).unwrap_or_default(),
            game.user_score.clone().unwrap_or_default(),
            game.rating.unwrap_or_default().to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn to_batch(games: &[Game]) -> Result<RecordBatch> {
    let text = |f: fn(&Game) -> Option<&str>| -> ArrayRef {
        Arc::new(games.iter().map(f).collect::<StringArray>())
    };
    let number = |f: fn(&Game) -> Option<f64>| -> ArrayRef {
        Arc::new(games.iter().map(f).collect::<Float64Array>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADERS[0], DataType::Utf8, false),
        Field::new(HEADERS[1], DataType::Utf8, false),
        Field::new(HEADERS[2], DataType::Float64, true),
        Field::new(HEADERS[3], DataType::Utf8, false),
        Field::new(HEADERS[4], DataType::Float64, true),
        Field::new(HEADERS[5], DataType::Utf8, true),
        Field::new(HEADERS[6], DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema,
        vec![
            text(|g| Some(g.name.as_str())),
            text(|g| Some(g.platform)),
            number(|g| g.year),
            text(|g| Some(g.genre)),
            number(|g| g.critic_score),
            text(|g| g.user_score.as_deref()),
            text(|g| g.rating),
        ],
    )
    .context("building record batch")?;
    Ok(batch)
}

fn write_parquet(path: &str, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let csv_path = args.next().unwrap_or_else(|| "games.csv".to_string());
    let parquet_path = args.next().unwrap_or_else(|| "games.parquet".to_string());

    let mut rng = SimpleRng::new(42);
    let games: Vec<Game> = (0..2000).map(|id| generate_game(id, &mut rng)).collect();

    write_csv(&csv_path, &games)?;
    let batch = to_batch(&games)?;
    write_parquet(&parquet_path, &batch)?;

    print_batches(&[batch.slice(0, 5)])?;
    println!(
        "Wrote {} games to {csv_path} and {parquet_path}",
        games.len()
    );
    Ok(())
}

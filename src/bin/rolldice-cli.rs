use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "rolldice-cli")]
#[command(about = "Client for the rolldice service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Sent as `User-Agent`, which flag rules may target.
    #[arg(short = 'a', long, default_value = "rolldice-cli")]
    user_agent: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll once and print the result
    Roll,
    /// Roll repeatedly and print the face distribution
    Histogram {
        #[arg(short, long, default_value_t = 600)]
        count: u32,
    },
    /// Show what the homepage answers, without following redirects
    Home,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .user_agent(cli.user_agent.clone())
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    match cli.command {
        Commands::Roll => {
            let start = Instant::now();
            let face = roll(&client, &cli.url).await?;
            println!("{} ({:?})", face, start.elapsed());
        }
        Commands::Histogram { count } => {
            let mut faces: BTreeMap<u8, u32> = (1..=6).map(|f| (f, 0)).collect();
            let start = Instant::now();
            for _ in 0..count {
                *faces.entry(roll(&client, &cli.url).await?).or_default() += 1;
            }
            let elapsed = start.elapsed();
            for (face, n) in &faces {
                let share = f64::from(*n) / f64::from(count.max(1));
                println!("{}: {:>6} {:>6.2}%", face, n, share * 100.0);
            }
            println!("{} rolls in {:?}", count, elapsed);
        }
        Commands::Home => {
            let res = client.get(format!("{}/", cli.url)).send().await?;
            println!("{}", res.status());
            if let Some(location) = res.headers().get(reqwest::header::LOCATION) {
                println!("Location: {}", location.to_str()?);
            }
            print!("{}", res.text().await?);
        }
    }

    Ok(())
}

async fn roll(client: &reqwest::Client, url: &str) -> Result<u8, Box<dyn std::error::Error>> {
    let res = client.get(format!("{}/rolldice", url)).send().await?;
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        return Err(format!("rolldice returned {}: {}", status, body.trim()).into());
    }
    Ok(body.trim().parse()?)
}

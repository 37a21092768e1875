//! Lab intranet database seeder
//!
//! Fills a running instance with realistic lab data through the public API:
//! staff accounts, reagents (some below threshold, some about to expire), a movement
//! history, tasks and announcements.
//!
//! Usage:
//!   `cargo run --bin seed_database -- --url http://localhost:3000 --token YOUR_JWT_TOKEN`

use anyhow::{Context, anyhow, bail};
use chrono::{Duration as ChronoDuration, Utc};
use clap::{Arg, Command};
use console::style;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use rand::seq::IndexedRandom;
use reqwest::Client;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::Duration;

const MAX_CONCURRENT_REQUESTS: usize = 8;

const STAFF: &[(&str, &str, &str, &str)] = &[
    ("mhoffmann", "Marta", "Hoffmann", "lab_head"),
    ("jkowalski", "Jan", "Kowalski", "employee"),
    ("lbernard", "Léa", "Bernard", "employee"),
    ("tnguyen", "Thi", "Nguyen", "employee"),
    ("sysop", "System", "Operator", "sysadmin"),
];

/// (name, category, opening stock, minimum threshold, days until expiry)
const REAGENTS: &[(&str, &str, i64, i64, Option<i64>)] = &[
    ("PBS 10x", "buffer", 1000, 200, Some(180)),
    ("Tris-HCl 1M", "buffer", 500, 100, None),
    ("Fetal Bovine Serum", "media", 50, 100, Some(20)),
    ("DMEM high glucose", "media", 12, 10, Some(12)),
    ("Trypsin-EDTA 0.25%", "enzyme", 8, 5, Some(25)),
    ("Taq polymerase", "enzyme", 3, 5, Some(90)),
    ("Anti-GFP antibody", "antibody", 2, 1, Some(40)),
    ("Anti-beta-actin antibody", "antibody", 1, 1, Some(7)),
    ("Ethanol 96%", "chemical", 4000, 1000, None),
    ("Agarose", "chemical", 250, 50, None),
    ("Parafilm", "other", 6, 2, None),
];

const TASKS: &[(&str, &str, &str, Option<i64>)] = &[
    ("Reorder fetal bovine serum", "new", "urgent", Some(-2)),
    ("Calibrate pH meter", "in_progress", "normal", Some(3)),
    ("Defrost -80 freezer B", "new", "high", Some(-1)),
    ("Update chemical inventory sheet", "done", "low", Some(-10)),
    ("Prepare onboarding binder", "new", "normal", None),
    ("Service biosafety cabinet", "cancelled", "normal", Some(14)),
];

const ANNOUNCEMENTS: &[(&str, &str, bool)] = &[
    (
        "Lab safety rules",
        "Lab coats and goggles are mandatory beyond the yellow line.",
        true,
    ),
    (
        "Group meeting moved",
        "This week's group meeting takes place on Thursday at 10:00.",
        false,
    ),
    (
        "New centrifuge",
        "The new centrifuge in room 204 can be booked from Monday.",
        false,
    ),
];

#[derive(Debug, Clone)]
pub struct SeedingConfig {
    pub base_url: String,
    pub jwt_token: Option<String>,
    pub client: Client,
}

#[derive(Debug, Default)]
pub struct CreatedObjects {
    pub users: Vec<Value>,
    pub reagents: Vec<Value>,
    pub movements: Vec<Value>,
    pub tasks: Vec<Value>,
    pub announcements: Vec<Value>,
}

pub struct DatabaseSeeder {
    config: SeedingConfig,
    created_objects: CreatedObjects,
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb
}

fn id_of(value: &Value) -> anyhow::Result<&str> {
    value["id"]
        .as_str()
        .ok_or_else(|| anyhow!("response has no id: {value}"))
}

async fn send(
    config: &SeedingConfig,
    endpoint: &str,
    payload: Option<&Value>,
) -> anyhow::Result<Value> {
    let url = format!("{}{}", config.base_url, endpoint);
    let mut request = match payload {
        Some(body) => config.client.post(&url).json(body),
        None => config.client.get(&url),
    };
    if let Some(token) = &config.jwt_token {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .with_context(|| format!("Request to {endpoint} failed"))?;
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        bail!("HTTP {status} {endpoint}: {error_text}");
    }
    response
        .json::<Value>()
        .await
        .with_context(|| format!("Invalid JSON from {endpoint}"))
}

impl DatabaseSeeder {
    pub fn new(base_url: &str, jwt_token: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Could not build HTTP client")?;

        Ok(Self {
            config: SeedingConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                jwt_token,
                client,
            },
            created_objects: CreatedObjects::default(),
        })
    }

    /// POSTs every payload with bounded concurrency, preserving input order.
    async fn post_parallel(
        &self,
        endpoint: &str,
        payloads: Vec<Value>,
        pb: &ProgressBar,
    ) -> anyhow::Result<Vec<Value>> {
        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_REQUESTS));
        let tasks = payloads.into_iter().map(|payload| {
            let semaphore = Arc::clone(&semaphore);
            let config = self.config.clone();
            let endpoint = endpoint.to_string();
            let pb = pb.clone();
            tokio::spawn(async move {
                let _permit = semaphore.acquire().await?;
                let result = send(&config, &endpoint, Some(&payload)).await;
                pb.inc(1);
                result
            })
        });

        join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.context("Seeding task panicked")?)
            .collect()
    }

    pub async fn test_connection(&self) -> anyhow::Result<()> {
        send(&self.config, "/healthz", None).await.map(|_| ())
    }

    pub async fn create_users(&mut self) -> anyhow::Result<()> {
        println!("{} Creating staff accounts...", style("[1/5]").bold().dim());
        let suffix: u16 = rand::rng().random();
        let payloads = STAFF
            .iter()
            .map(|(username, first_name, last_name, role)| {
                json!({
                    "username": format!("{username}{suffix}"),
                    "email": format!("{username}{suffix}@lab.example.org"),
                    "first_name": first_name,
                    "last_name": last_name,
                    "role": role,
                })
            })
            .collect::<Vec<_>>();

        let pb = progress_bar(payloads.len() as u64);
        self.created_objects.users = self.post_parallel("/api/users", payloads, &pb).await?;
        pb.finish_with_message("users");
        Ok(())
    }

    pub async fn create_reagents(&mut self) -> anyhow::Result<()> {
        println!("{} Creating reagents...", style("[2/5]").bold().dim());
        let today = Utc::now().date_naive();
        let payloads = REAGENTS
            .iter()
            .map(|(name, category, on_hand, min_threshold, expires_in)| {
                json!({
                    "name": name,
                    "category": category,
                    "on_hand": on_hand.to_string(),
                    "min_threshold": min_threshold.to_string(),
                    "expiry_date": expires_in.map(|days| (today + ChronoDuration::days(days)).to_string()),
                })
            })
            .collect::<Vec<_>>();

        let pb = progress_bar(payloads.len() as u64);
        self.created_objects.reagents =
            self.post_parallel("/api/reagents", payloads, &pb).await?;
        pb.finish_with_message("reagents");
        Ok(())
    }

    /// Books small withdrawals and deliveries against the well-stocked reagents.
    pub async fn create_movements(&mut self) -> anyhow::Result<()> {
        println!("{} Recording movements...", style("[3/5]").bold().dim());
        let mut rng = rand::rng();
        let mut payloads = Vec::new();

        for reagent in &self.created_objects.reagents {
            let reagent_id = id_of(reagent)?;
            for _ in 0..rng.random_range(2..6) {
                let user = self.created_objects.users.choose(&mut rng);
                let (movement_type, quantity, comment) = if rng.random_bool(0.7) {
                    ("out", rng.random_range(1..4), "Used for experiment")
                } else {
                    ("in", rng.random_range(5..20), "Supplier delivery")
                };
                let days_ago = rng.random_range(0..60);
                payloads.push(json!({
                    "reagent_id": reagent_id,
                    "quantity": quantity.to_string(),
                    "movement_type": movement_type,
                    "comment": comment,
                    "user_id": user.and_then(|u| u["id"].as_str()),
                    "date": (Utc::now() - ChronoDuration::days(days_ago)).to_rfc3339(),
                }));
            }
        }

        let pb = progress_bar(payloads.len() as u64);
        self.created_objects.movements = self
            .post_parallel("/api/reagent_movements", payloads, &pb)
            .await?;
        pb.finish_with_message("movements");
        Ok(())
    }

    pub async fn create_tasks(&mut self) -> anyhow::Result<()> {
        println!("{} Creating tasks...", style("[4/5]").bold().dim());
        let mut rng = rand::rng();
        let creator = self.created_objects.users.first().and_then(|u| u["id"].as_str());

        let payloads = TASKS
            .iter()
            .map(|(title, status, priority, deadline_in)| {
                let assignee = self.created_objects.users.choose(&mut rng);
                json!({
                    "title": title,
                    "description": format!("{title}. Seeded example task."),
                    "status": status,
                    "priority": priority,
                    "deadline": deadline_in.map(|days| (Utc::now() + ChronoDuration::days(days)).to_rfc3339()),
                    "assignee_id": assignee.and_then(|u| u["id"].as_str()),
                    "creator_id": creator,
                })
            })
            .collect::<Vec<_>>();

        let pb = progress_bar(payloads.len() as u64);
        self.created_objects.tasks = self.post_parallel("/api/tasks", payloads, &pb).await?;
        pb.finish_with_message("tasks");
        Ok(())
    }

    pub async fn create_announcements(&mut self) -> anyhow::Result<()> {
        println!("{} Publishing announcements...", style("[5/5]").bold().dim());
        let author = self.created_objects.users.first().and_then(|u| u["id"].as_str());
        let payloads = ANNOUNCEMENTS
            .iter()
            .map(|(title, text, is_pinned)| {
                json!({
                    "title": title,
                    "text": text,
                    "is_pinned": is_pinned,
                    "author_id": author,
                })
            })
            .collect::<Vec<_>>();

        let pb = progress_bar(payloads.len() as u64);
        self.created_objects.announcements = self
            .post_parallel("/api/announcements", payloads, &pb)
            .await?;
        pb.finish_with_message("announcements");
        Ok(())
    }

    pub async fn seed_database(&mut self) -> anyhow::Result<()> {
        self.test_connection()
            .await
            .context("API is not reachable")?;

        self.create_users().await?;
        self.create_reagents().await?;
        self.create_movements().await?;
        self.create_tasks().await?;
        self.create_announcements().await?;

        self.display_summary();
        Ok(())
    }

    fn display_summary(&self) {
        println!();
        println!("{}", style("Database seeding complete").bold().green());
        println!("{}", style("=".repeat(40)).dim());

        let counts = [
            ("Users", self.created_objects.users.len()),
            ("Reagents", self.created_objects.reagents.len()),
            ("Movements", self.created_objects.movements.len()),
            ("Tasks", self.created_objects.tasks.len()),
            ("Announcements", self.created_objects.announcements.len()),
        ];
        for (name, count) in counts {
            println!("  {:<14} {}", style(name).cyan(), style(count).bold().green());
        }

        let critical = self
            .created_objects
            .reagents
            .iter()
            .filter(|r| r["is_critical"] == true)
            .count();
        println!(
            "  {} reagents start below their minimum threshold",
            style(critical).bold().yellow()
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("Lab Intranet Seeder")
        .version("1.0")
        .about("Seeds the lab intranet with staff, reagents, movements, tasks and announcements")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("API base URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new("token")
                .short('t')
                .long("token")
                .value_name("JWT_TOKEN")
                .help("JWT authentication token (omit when auth is disabled)"),
        )
        .get_matches();

    let base_url = matches
        .get_one::<String>("url")
        .cloned()
        .unwrap_or_else(|| "http://localhost:3000".to_string());
    let jwt_token = matches.get_one::<String>("token").cloned();

    println!("{}", style("Lab Intranet Seeder v1.0").bold());
    println!("{}", style("-".repeat(40)).dim());
    println!("API URL: {}", style(&base_url).cyan());

    let mut seeder = DatabaseSeeder::new(&base_url, jwt_token)?;
    seeder.seed_database().await
}

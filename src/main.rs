mod export;
mod filter;
mod loader;
mod models;
mod normalizer;
mod rooms;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use filter::FilterCriteria;
use models::{Config, Participant, SummaryCounts};
use normalizer::Normalizer;
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    let matches = Command::new("peserta-filter")
        .version("1.0")
        .about("Filters, room-assigns and exports competition participant rosters")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("level")
                .long("level")
                .value_name("LEVEL")
                .help("Exact level filter, e.g. \"Level 1\"")
                .default_value(""),
        )
        .arg(
            Arg::new("bidang")
                .long("bidang")
                .value_name("SUBJECT")
                .help("Subject filter: Matematika or Sains")
                .default_value(""),
        )
        .arg(
            Arg::new("cari")
                .long("cari")
                .value_name("TEXT")
                .help("Case-insensitive search over name, school, level and subject")
                .default_value(""),
        )
        .arg(
            Arg::new("ruang")
                .long("ruang")
                .value_name("ROOM")
                .help("Exact assigned-room filter, e.g. \"Ruang 1 Mekkah\"")
                .default_value(""),
        )
        .arg(
            Arg::new("no-csv")
                .long("no-csv")
                .action(ArgAction::SetTrue)
                .help("Skip the CSV export"),
        )
        .arg(
            Arg::new("no-pdf")
                .long("no-pdf")
                .action(ArgAction::SetTrue)
                .help("Skip the PDF export"),
        )
        .get_matches();

    let config_file = matches.get_one::<String>("config").unwrap();

    // Load or create configuration
    let config = if Path::new(config_file).exists() {
        println!("📋 Loading configuration from: {}", config_file);
        Config::load_from_file(config_file)?
    } else {
        println!("📝 Creating default configuration file: {}", config_file);
        let default_config = Config::default();
        default_config.save_to_file(config_file)?;
        println!(
            "⚠️  Please edit {} and point data_file at the roster JSON, then run the program again.",
            config_file
        );
        return Ok(());
    };

    if !Path::new(&config.data_file).exists() {
        println!("❌ Error: dataset not found: {}", config.data_file);
        println!("   Please edit {} and set data_file", config_file);
        return Ok(());
    }

    let criteria = FilterCriteria {
        level: matches.get_one::<String>("level").unwrap().trim().to_string(),
        subject: matches.get_one::<String>("bidang").unwrap().trim().to_string(),
        search: matches.get_one::<String>("cari").unwrap().to_string(),
    };
    let room_filter = matches.get_one::<String>("ruang").unwrap().trim().to_string();

    // Load once; all later passes derive new collections from this one.
    let normalizer = Normalizer::new(&config.acronyms)?;
    let participants = loader::load_dataset(&config.data_file, &normalizer)?;
    println!("📂 Loaded {} records from: {}", participants.len(), config.data_file);

    let counts = SummaryCounts::of(&participants);
    let levels = loader::distinct_levels(&participants);

    let filtered = filter::filter_participants(&participants, &criteria);
    let assigned = rooms::assign_rooms(&filtered);
    let rooms_in_view = rooms::distinct_rooms(&assigned);
    let final_rows = rooms::filter_by_room(&assigned, &room_filter);

    print_filters(&criteria, &room_filter);
    print_table(&final_rows);
    print_summary(&counts, &levels, &rooms_in_view, final_rows.len());

    let output_dir = config.output_directory.as_deref().unwrap_or("output");
    fs::create_dir_all(output_dir)?;

    let csv_name = config.csv_filename.as_deref().unwrap_or("peserta_terfilter.csv");
    let pdf_name = config.pdf_filename.as_deref().unwrap_or("peserta_terfilter.pdf");
    clean_output_directory(output_dir, &[csv_name, pdf_name])?;

    if !matches.get_flag("no-csv") {
        let csv_path = Path::new(output_dir).join(csv_name);
        if export::write_csv(&final_rows, &csv_path)? {
            println!("💾 CSV written: {}", csv_path.display());
        } else {
            println!("⚠️  No rows to export, CSV skipped");
        }
    }

    if !matches.get_flag("no-pdf") {
        let pdf_path = Path::new(output_dir).join(pdf_name);
        if export::write_pdf(
            &final_rows,
            &criteria.subject,
            &criteria.level,
            &room_filter,
            &pdf_path,
        )? {
            println!("💾 PDF written: {}", pdf_path.display());
        } else {
            println!("⚠️  No rows to export, PDF skipped");
        }
    }

    println!("\n✅ Done.");
    Ok(())
}

fn print_filters(criteria: &FilterCriteria, room_filter: &str) {
    let mut active = Vec::new();
    if !criteria.level.is_empty() {
        active.push(format!("level={}", criteria.level));
    }
    if !criteria.subject.is_empty() {
        active.push(format!("bidang={}", criteria.subject));
    }
    if !criteria.search.is_empty() {
        active.push(format!("cari={}", criteria.search));
    }
    if !room_filter.is_empty() {
        active.push(format!("ruang={}", room_filter));
    }
    if active.is_empty() {
        println!("🔎 Filters: none");
    } else {
        println!("🔎 Filters: {}", active.join(", "));
    }
}

fn print_table(rows: &[Participant]) {
    println!(
        "\n{:<5} {:<28} {:<28} {:<8} {:<24} {:<18} {:<12}",
        "No", "Nama", "Sekolah", "Level", "Bidang", "Ruang", "Bahasa"
    );
    println!("{}", "-".repeat(128));
    for row in rows {
        println!(
            "{:<5} {:<28} {:<28} {:<8} {:<24} {:<18} {:<12}",
            row.no,
            clip(&row.name, 28),
            clip(&row.school, 28),
            clip(&row.level, 8),
            clip(&row.bidang, 24),
            clip(&row.ruang, 18),
            clip(&row.language, 12),
        );
    }
}

fn print_summary(counts: &SummaryCounts, levels: &[String], rooms: &[String], shown: usize) {
    println!("\n📊 RINGKASAN");
    println!("   Total peserta: {}", counts.total);
    println!("   Matematika: {}", counts.matematika);
    println!("   Sains: {}", counts.sains);
    println!("   Mengikuti keduanya: {}", counts.keduanya);
    println!("   Ditampilkan: {}", shown);
    println!("   Level: {}", levels.join(", "));
    if !rooms.is_empty() {
        println!("   Ruang: {}", rooms.join(", "));
    }
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

// Remove previous export artifacts so a filtered run never leaves stale files.
fn clean_output_directory(output_dir: &str, artifacts: &[&str]) -> Result<()> {
    let output_path = Path::new(output_dir);
    if !output_path.exists() {
        return Ok(());
    }

    for item in artifacts {
        let item_path = output_path.join(item);
        if item_path.is_file() {
            fs::remove_file(&item_path)?;
            println!("   🗑️  Removed previous export: {}", item);
        }
    }
    Ok(())
}

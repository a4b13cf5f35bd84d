// main.rs - CLI entry point

use env_logger::{Builder, Env};
use log::LevelFilter;
use std::time::Instant;
use ystrdist::cli::Config;
use ystrdist::core::{MarkerStatistics, MODAL_LABEL};
use ystrdist::prelude::*;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_env(Env::default())
        .init();
}

fn run_main() -> std::result::Result<(), String> {
    let args: Args = argh::from_env();

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    init_logger();
    run(args).map_err(|e| e.to_string())
}

fn run(mut args: Args) -> Result<()> {
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let validation_result = validate_args(&args)?;

    println!("🚀 ystrdist v{}", ystrdist::VERSION);

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| Error::InvalidParameter(format!("Failed to configure thread pool: {}", e)))?;
        println!("🧵 Threads: {}", n);
    } else {
        println!("🧵 Threads: {} (auto-detected)", rayon::current_num_threads());
    }

    let total_start = Instant::now();

    // Marker layout
    let layout = match &args.layout {
        Some(path) => MarkerLayout::from_file(path)?,
        None => MarkerLayout::ftdna(),
    };
    println!(
        "🧬 Layout: {} markers + {} overflow slots",
        layout.canonical_len(),
        layout.overflow_len()
    );

    // Mutation rates
    let rates = match &args.rates_in {
        Some(path) => read_rates(path, &layout)?,
        None => MutationRates::ones(&layout),
    };
    println!("📐 Mutation rates: {} markers enabled", rates.enabled_count());
    if let Some(path) = &args.rates_out {
        write_rates(path, &layout, &rates)?;
        println!("✅ Mutation rates written to: {}", path);
    }

    // Persons
    let Some(persons_path) = args.persons.as_ref() else {
        if args.rates_out.is_some() {
            return Ok(());
        }
        return Err(Error::InvalidParameter("--persons is required".to_string()));
    };
    let mut persons = read_persons(persons_path, &layout, args.label_column)?;
    println!("👥 Loaded {} persons from {}", persons.len(), persons_path);

    persons = filter_by_label(
        persons,
        validation_result.include_regex.as_ref(),
        validation_result.exclude_regex.as_ref(),
    );
    if let Some(n_markers) = args.markers {
        persons = reduce_to_marker_set(&layout, &persons, n_markers)?;
        println!("🔍 {} persons tested for the first {} markers", persons.len(), n_markers);
    }
    if let Some(factor) = args.reduce {
        persons = reduce_count(&persons, factor)?;
        println!("🔍 Reduced to every {}th person: {} persons", factor, persons.len());
    }
    if args.anonymize {
        persons = anonymize(&persons);
        println!("🕶️  Persons anonymized");
    }
    if args.modal {
        let modal = modal_haplotype(&layout, &persons);
        persons.insert(0, modal);
        println!("⭐ Modal haplotype added as '{}'", MODAL_LABEL);
    }

    // Person tables
    if let Some(path) = &args.txt_out {
        write_persons_txt(path, &persons, args.values)?;
        println!("✅ Persons written to: {}", path);
    }
    if let Some(path) = &args.html_out {
        write_persons_html(path, &layout, &persons, args.values)?;
        println!("✅ HTML table written to: {}", path);
    }

    // Marker statistics and selection
    if args.stats || args.has_selection() || args.counting_rates_out.is_some() {
        // The modal haplotype is not part of the population
        let population = if args.modal { &persons[1..] } else { &persons[..] };
        let mut stats = statistics(&layout, population);
        if args.has_selection() {
            stats = select(
                &stats,
                args.select_min_frequency,
                args.select_min_values,
                args.select_max_values.unwrap_or(usize::MAX),
            );
        }
        if args.stats {
            print_statistics(&stats);
        }
        if let Some(path) = &args.counting_rates_out {
            let counting = counting_rates(&layout, &stats)?;
            write_rates(path, &layout, &counting)?;
            println!("✅ Counting rates for {} markers written to: {}", stats.len(), path);
        }
    }

    // Distance matrix
    if let Some(path) = &args.matrix_out {
        println!(
            "\n🔄 Computing distance matrix: {}",
            validation_result.model.description()
        );
        let metric = validation_result.model.metric(&layout);
        let matrix = DistanceMatrix::build_with_progress(&persons, &rates, metric.as_ref(), args.progress)?
            .rescale(args.generation, args.calibration);
        if matrix.undefined_count() > 0 {
            println!("⚠️  {} pairs share no comparable marker (written as NA)", matrix.undefined_count());
        }

        if args.modal {
            match mean_and_std_dev(&matrix.distances_to(0)) {
                Ok((mean, std_dev)) => println!("⭐ Distance to modal: {:.1} ± {:.1} years", mean, std_dev),
                Err(e) => log::warn!("No distance summary to the modal haplotype: {}", e),
            }
        }

        write_matrix(path, validation_result.format, &persons, &matrix)?;
        println!("✅ Distance matrix written to: {} ({:?})", path, validation_result.format);
    }

    // Print summary
    println!("\n🎉 === YSTRDIST COMPLETED SUCCESSFULLY ===");
    println!("⏱️  Total execution time: {:.2}s", total_start.elapsed().as_secs_f64());
    println!("📊 Persons: {}", persons.len());
    println!("🔧 Command: {}", command_line);

    Ok(())
}

fn print_statistics(stats: &MarkerStatistics) {
    println!("\n📈 === MARKER STATISTICS ({} persons) ===", stats.population);
    println!("{:<14} {:>9} {:>9} {:>7}  values", "marker", "frequency", "distinct", "modal");
    for marker in &stats.markers {
        let values = marker
            .counts
            .iter()
            .map(|(value, count)| format!("{}:{}", value, count))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{:<14} {:>8.1}% {:>9} {:>7}  {}",
            marker.name,
            marker.frequency * 100.0,
            marker.distinct_values(),
            marker.modal_value(),
            values
        );
    }
}

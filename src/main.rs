use anyhow::Result;
use clap::Parser;
use runner_match::alphabet::{Alphabet, PinyinAlphabet};
use runner_match::config::{self, Config, LaunchGroup};
use runner_match::matcher::{MatchOption, StringMatcher};
use runner_match::model::{self, Entry, EntryType, SearchPrecisionScore};
use runner_match::sources::{Source, bin::BinSource, desktop::DesktopSource, history, scripts::ScriptsSource};
use runner_match::state::SearchState;
use std::io::{self, BufRead};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text to search for
    query: String,

    /// Launch group to use
    #[arg(short, long, default_value = "default")]
    group: String,

    /// Minimum precision: none, low or regular
    #[arg(short, long)]
    precision: Option<SearchPrecisionScore>,

    /// Match case exactly
    #[arg(long)]
    case_sensitive: bool,

    /// Maximum number of results to print
    #[arg(short, long, default_value_t = 10)]
    limit: usize,

    /// Read candidates from stdin, one per line, instead of scanning sources
    #[arg(long)]
    stdin: bool,

    /// Count a launch of the best result in the usage history
    #[arg(long)]
    record: bool,
}

fn build_matcher(config: &Config, args: &Args) -> StringMatcher {
    let mut option = config.matching.match_option();
    if args.case_sensitive {
        option = MatchOption { ignore_case: false };
    }
    let precision = args.precision.unwrap_or(config.matching.precision);

    let matcher = if config.matching.use_pinyin {
        let pinyin = PinyinAlphabet::from_config(&config.matching);
        // A query already written in Han characters is compared as typed.
        if pinyin.should_translate(&args.query) {
            StringMatcher::with_alphabet(Arc::new(pinyin))
        } else {
            log::debug!("Query {:?} is not pinyin, skipping transliteration", args.query);
            StringMatcher::new()
        }
    } else {
        StringMatcher::new()
    };

    matcher.with_precision(precision).with_option(option)
}

fn collect_entries(config: &Config, group: &LaunchGroup) -> Vec<Entry> {
    let mut entries: Vec<Entry> = group.items.iter()
        .map(|item| Entry::new(
            format!("custom:{}", item.name),
            item.name.clone(),
            item.command.clone(),
            EntryType::Custom,
        ))
        .collect();

    let sources: [(&str, Box<dyn Source>); 3] = [
        ("desktop", Box::new(DesktopSource::default())),
        ("bin", Box::new(BinSource)),
        ("scripts", Box::new(ScriptsSource::default())),
    ];
    for (name, source) in sources {
        if !config.source_enabled(group, name) {
            continue;
        }
        match source.scan() {
            Ok(mut found) => entries.append(&mut found),
            Err(e) => log::warn!("Source '{}' failed: {}", name, e),
        }
    }
    entries
}

fn read_stdin_entries() -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(Entry::new(format!("stdin:{}", line), line.clone(), line, EntryType::Custom));
    }
    Ok(entries)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = config::load_config()?;

    // Validate group exists, fallback to default if not
    let group_name = if config.groups.contains_key(&args.group) {
        args.group.clone()
    } else {
        log::warn!("Unknown group '{}', using default", args.group);
        "default".to_string()
    };
    let group = config.groups.get(&group_name).cloned().unwrap_or_default();

    let matcher = Arc::new(build_matcher(&config, &args));
    let entries = if args.stdin {
        read_stdin_entries()?
    } else {
        collect_entries(&config, &group)
    };

    let mut state = SearchState::new(matcher, history::load_history()).with_group(&group);
    state.set_entries(entries);
    state.update_query(&args.query);

    for entry in state.results().take(args.limit) {
        let highlighted = model::highlight(&entry.name, &entry.highlight, "[", "]");
        println!("{:>5}  {}  ({})", entry.score, highlighted, entry.command);
    }

    if args.record {
        if let (Some(best), Some(path)) = (state.results().next(), history::get_history_path()) {
            let mut usage = state.history.clone();
            usage.increment(&best.id);
            usage.truncate(config.general.history_size);
            history::save_history_to(&path, &usage)?;
        }
    }

    Ok(())
}

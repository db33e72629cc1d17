use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ownkit_config::OwnkitConfig;
use ownkit_core::prelude::*;
use ownkit_telemetry::MetricsRecorder;
use tracing::info_span;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "ownkit", version, about)]
pub struct Cli {
    /// Configuration file to load instead of config/ownkit.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Append lines to a bounded buffer, then copy and move it
    Buffer(BufferArgs),
    /// Run an allocate/free scenario against a bucket heap
    Heap(HeapArgs),
    /// Copy, move and rename scoped timers
    Timer(TimerArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct BufferArgs {
    /// Buffer capacity in bytes (defaults to buffer.default_capacity)
    #[arg(long)]
    pub capacity: Option<usize>,
    /// Lines to append, in order
    #[arg(required = true)]
    pub lines: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct HeapArgs {
    /// Number of blocks (defaults to heap.block_count)
    #[arg(long)]
    pub blocks: Option<usize>,
    /// Bytes per block (defaults to heap.block_size)
    #[arg(long)]
    pub block_size: Option<usize>,
    /// linear-scan or free-stack (defaults to heap.policy)
    #[arg(long)]
    pub policy: Option<SearchPolicy>,
    /// Allocations to attempt before freeing (defaults to one more than the block count)
    #[arg(long)]
    pub requests: Option<usize>,
    /// Bytes per request (defaults to the block size)
    #[arg(long)]
    pub size: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct TimerArgs {
    #[arg(long, default_value = "t")]
    pub name: String,
}

pub fn load_config(path: Option<&PathBuf>) -> Result<OwnkitConfig, CliError> {
    let config = match path {
        Some(path) => OwnkitConfig::load_from_path(path)?,
        None => OwnkitConfig::load()?,
    };
    Ok(config)
}

pub fn run_buffer(
    args: &BufferArgs,
    config: &OwnkitConfig,
    metrics: &MetricsRecorder,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let _span = info_span!("buffer").entered();

    let capacity = args.capacity.unwrap_or(config.buffer.default_capacity);
    let mut buffer = BoundedBuffer::new(capacity)?;
    for line in &args.lines {
        let accepted = buffer.append_line(line);
        metrics.record_append(accepted);
        if !accepted {
            writeln!(
                out,
                "rejected {:?}: {} bytes left, {} needed",
                line,
                buffer.remaining(),
                line.len() + 1
            )?;
        }
    }
    write!(out, "{}", buffer.render("original"))?;

    let mut copy = buffer.clone();
    let accepted = copy.append_line("(copy only)");
    metrics.record_append(accepted);
    write!(out, "{}", copy.render("copy"))?;

    let owner = BufferOwner::from_buffer(buffer.take());
    writeln!(
        out,
        "moved: source capacity {}, length {}; owner holds {} bytes",
        buffer.capacity(),
        buffer.len(),
        owner.buffer().len()
    )?;

    match BufferOwner::with_capacity(config.buffer.owner_capacity, &args.lines[0]) {
        Ok(_) => writeln!(out, "owner built for first line")?,
        Err(e) => writeln!(out, "owner refused first line: {e}")?,
    }
    Ok(())
}

pub fn run_heap(
    args: &HeapArgs,
    config: &OwnkitConfig,
    metrics: &MetricsRecorder,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let _span = info_span!("heap").entered();

    let blocks = args.blocks.unwrap_or(config.heap.block_count);
    let block_size = args.block_size.unwrap_or(config.heap.block_size);
    let policy = match args.policy {
        Some(policy) => policy,
        None => config.heap.policy.parse()?,
    };
    let requests = args.requests.unwrap_or(blocks.saturating_add(1));
    let size = args.size.unwrap_or(block_size);

    let mut heap = BucketHeap::with_policy(blocks, block_size, policy)?;
    writeln!(out, "{blocks} blocks of {block_size} bytes, {policy}")?;

    let mut handles = Vec::new();
    for i in 0..requests {
        match heap.allocate(size) {
            Ok(handle) => {
                writeln!(out, "#{i}: block {} at {:#x}", handle.index(), handle.addr())?;
                handles.push(handle);
            }
            Err(e) => writeln!(out, "#{i}: {e}")?,
        }
    }

    if let Some(first) = handles.first().copied() {
        heap.free(first);
        match heap.allocate(size) {
            Ok(handle) => writeln!(
                out,
                "after freeing block {}: got block {} at {:#x}",
                first.index(),
                handle.index(),
                handle.addr()
            )?,
            Err(e) => writeln!(out, "after freeing block {}: {e}", first.index())?,
        }
    }

    let stats = heap.stats();
    writeln!(
        out,
        "allocations {}, failed {}, frees {}, in use {}/{}",
        stats.allocations(),
        stats.failed_allocations(),
        stats.frees(),
        heap.in_use(),
        heap.block_count()
    )?;
    metrics.record_heap(&stats);
    Ok(())
}

pub fn run_timer(args: &TimerArgs, out: &mut impl Write) -> Result<(), CliError> {
    let _span = info_span!("timer").entered();

    let original = ScopedTimer::new(&args.name);
    let mut copy = original.clone();
    copy.set_name(&format!("{}-copy", args.name));

    let mut source = ScopedTimer::new(&format!("{}-moveable", args.name));
    let mut moved = source.take();
    moved.set_name(&format!("{}-moved", args.name));

    writeln!(
        out,
        "{} started at {}; copy {:?}; moved {:?}; source moved-from: {}",
        args.name,
        original.timestamp(),
        copy.name().unwrap_or_default(),
        moved.name().unwrap_or_default(),
        source.is_moved_from()
    )?;
    Ok(())
}

pub fn run_config(config: &OwnkitConfig, out: &mut impl Write) -> Result<(), CliError> {
    write!(out, "{}", serde_yaml::to_string(config)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<(), CliError>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn cli_parses_heap_args() {
        let cli = Cli::parse_from(["ownkit", "heap", "--blocks", "4", "--policy", "free-stack"]);
        match cli.command {
            Commands::Heap(args) => {
                assert_eq!(args.blocks, Some(4));
                assert_eq!(args.policy, Some(SearchPolicy::FreeStack));
            }
            _ => panic!("expected heap command"),
        }
    }

    #[test]
    fn heap_scenario_reports_exhaustion() {
        let config = OwnkitConfig::default();
        let metrics = MetricsRecorder::new().unwrap();
        let args = HeapArgs {
            blocks: None,
            block_size: None,
            policy: None,
            requests: None,
            size: None,
        };
        let text = output(|out| run_heap(&args, &config, &metrics, out));

        assert!(text.starts_with("10 blocks of 4096 bytes, linear-scan"));
        assert!(text.contains("#10: Out of memory"));
        assert!(text.contains("after freeing block 0: got block 0"));
        assert!(text.contains("allocations 11, failed 1, frees 1, in use 10/10"));
        assert_eq!(metrics.failed_allocations.get(), 1);
    }

    #[test]
    fn oversized_heap_is_an_error() {
        let config = OwnkitConfig::default();
        let metrics = MetricsRecorder::new().unwrap();
        let mut args = HeapArgs {
            blocks: Some(usize::MAX),
            block_size: None,
            policy: None,
            requests: None,
            size: None,
        };
        let mut out = Vec::new();
        assert!(matches!(
            run_heap(&args, &config, &metrics, &mut out),
            Err(CliError::Core(CoreError::InvalidArgument(_)))
        ));

        args.block_size = Some(1);
        assert!(matches!(
            run_heap(&args, &config, &metrics, &mut out),
            Err(CliError::Core(CoreError::OutOfMemory { .. }))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn buffer_demo_reports_rejected_line() {
        let config = OwnkitConfig::default();
        let metrics = MetricsRecorder::new().unwrap();
        let args = BufferArgs {
            capacity: Some(16),
            lines: vec!["hello".into(), "this will not fit".into()],
        };
        let text = output(|out| run_buffer(&args, &config, &metrics, out));

        assert!(text.contains("rejected \"this will not fit\""));
        assert!(text.contains("original: hello\n"));
        assert!(text.contains("moved: source capacity 0, length 0; owner holds 6 bytes"));
        assert!(text.contains("owner built for first line"));
    }

    #[test]
    fn config_renders_yaml() {
        let text = output(|out| run_config(&OwnkitConfig::default(), out));
        assert!(text.contains("block_size: 4096"));
        assert!(text.contains("policy: linear-scan"));
    }

    #[test]
    fn timer_demo_moves() {
        let text = output(|out| run_timer(&TimerArgs { name: "t".into() }, out));
        assert!(text.contains("moved \"t-moved\""));
        assert!(text.contains("source moved-from: true"));
    }
}

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use linkfs_chain::{verify_chain, ChainBuilder, ChainConfig, ChainNode, ChainReader};
use linkfs_store::FsChunkStore;
use linkfs_types::{NodeHash, NodeHasher};
use serde_json::json;
use tracing::debug;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    run_command_to(cli, &mut std::io::stdout()).await
}

/// Run a command, writing its report (or fetched file bytes) to `out`.
pub async fn run_command_to<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ChainConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ChainConfig::default(),
    };
    let json = matches!(cli.format, OutputFormat::Json);
    debug!(?config, store = %cli.store.display(), "configuration loaded");

    match cli.command {
        Command::Put(args) => cmd_put(open_store(&cli.store).await?, config, args, json, out).await,
        Command::Get(args) => cmd_get(open_store(&cli.store).await?, config, args, json, out).await,
        Command::Inspect(args) => {
            cmd_inspect(open_store(&cli.store).await?, config, args, json, out).await
        }
        Command::Hash(args) => cmd_hash(args, json, out),
    }
}

async fn open_store(root: &Path) -> anyhow::Result<FsChunkStore> {
    FsChunkStore::open(root)
        .await
        .with_context(|| format!("opening store {}", root.display()))
}

fn parse_head(hex: &str) -> anyhow::Result<NodeHash> {
    NodeHash::from_hex(hex.trim()).with_context(|| format!("invalid head hash {hex:?}"))
}

async fn cmd_put<W: Write>(
    store: FsChunkStore,
    config: ChainConfig,
    args: PutArgs,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let chain = ChainBuilder::new(store, config)
        .store_file_by_name(&args.path)
        .await
        .with_context(|| format!("storing {}", args.path.display()))?;

    if json {
        writeln!(
            out,
            "{}",
            json!({ "path": args.path, "head": chain.head(), "hashes": chain.hashes() })
        )?;
        return Ok(());
    }

    writeln!(out, "{} Stored {} in {} node(s)", "✓".green().bold(), args.path.display().to_string().bold(), chain.len())?;
    writeln!(out, "  Head: {}", chain.head().to_hex().yellow())?;
    if args.all {
        for (i, hash) in chain.hashes().iter().enumerate() {
            writeln!(out, "  {:>4} {}", i, hash.to_hex().dimmed())?;
        }
    }
    Ok(())
}

async fn cmd_get<W: Write>(
    store: FsChunkStore,
    config: ChainConfig,
    args: GetArgs,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let head = parse_head(&args.head)?;
    let data = ChainReader::new(store, config)
        .fetch_file(&head)
        .await
        .with_context(|| format!("fetching {head}"))?;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &data)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            if json {
                writeln!(out, "{}", json!({ "head": head, "path": path, "bytes": data.len() }))?;
            } else {
                writeln!(out, "{} Wrote {} bytes to {}", "✓".green().bold(), data.len(), path.display().to_string().bold())?;
            }
        }
        None => out.write_all(&data)?,
    }
    out.flush()?;
    Ok(())
}

async fn cmd_inspect<W: Write>(
    store: FsChunkStore,
    config: ChainConfig,
    args: InspectArgs,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let head = parse_head(&args.head)?;
    let reader = ChainReader::new(store, config);
    let nodes = if args.verify {
        let raw = reader
            .fetch_raw(&head)
            .await
            .with_context(|| format!("walking chain {head}"))?;
        verify_chain(&raw, &NodeHasher::NODE).context("chain verification failed")?;
        raw.iter()
            .map(|(hash, bytes)| ChainNode::parse(hash, bytes))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        reader
            .fetch_nodes(&head)
            .await
            .with_context(|| format!("walking chain {head}"))?
    };
    let total: usize = nodes.iter().map(|n| n.payload_len).sum();

    if json {
        writeln!(
            out,
            "{}",
            json!({ "head": head, "nodes": nodes, "bytes": total, "verified": args.verify })
        )?;
        return Ok(());
    }

    writeln!(out, "Chain {}: {} node(s), {} bytes", head.to_hex().yellow().bold(), nodes.len(), total)?;
    for (i, node) in nodes.iter().enumerate() {
        let next = if node.is_tail() {
            "end".dimmed().to_string()
        } else {
            node.next.short_hex().cyan().to_string()
        };
        writeln!(out, "  {:>4} {} {:>5} B → {}", i, node.hash.short_hex(), node.payload_len, next)?;
    }
    if args.verify {
        writeln!(out, "{} Hashes and links verified", "✓".green().bold())?;
    }
    Ok(())
}

fn cmd_hash<W: Write>(args: HashArgs, json: bool, out: &mut W) -> anyhow::Result<()> {
    let hash = parse_head(&args.hex)?;
    if json {
        writeln!(out, "{}", json!({ "hash": hash, "sentinel": hash.is_sentinel() }))?;
    } else if hash.is_sentinel() {
        writeln!(out, "{} {}", hash.to_hex().yellow(), "(end-of-chain sentinel)".dimmed())?;
    } else {
        writeln!(out, "{}", hash.to_hex().yellow())?;
    }
    Ok(())
}

use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use tokio::sync::mpsc::UnboundedReceiver;

use ownreg_client::{
    ChannelNotifier, HttpTransport, Level, Notification, OwnerStateStore, Paginator,
};
use ownreg_server::{OwnerServer, ServerConfig};
use ownreg_types::{OwnerId, OwnerProjection};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::List(args) => cmd_list(args, format).await,
        Command::Create(args) => cmd_create(args, format).await,
        Command::Update(args) => cmd_update(args, format).await,
        Command::Delete(args) => cmd_delete(args).await,
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.data.is_some() {
        config.data_path = args.data;
    }
    config.allow_cors |= args.cors;

    let storage = match &config.data_path {
        Some(path) => path.display().to_string(),
        None => "memory".to_string(),
    };
    println!(
        "{} Owner registry on {} (storage: {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        storage.cyan()
    );
    let server = OwnerServer::new(config)?;
    server.serve().await?;
    Ok(())
}

type Session = (OwnerStateStore, UnboundedReceiver<Notification>);

fn connect(remote: &RemoteArgs) -> anyhow::Result<Session> {
    tracing::debug!(server = %remote.server, timeout_ms = remote.timeout_ms, "connecting");
    let transport = HttpTransport::new(&remote.client_config())
        .with_context(|| format!("connecting to {}", remote.server))?;
    let (notifier, rx) = ChannelNotifier::new();
    Ok((
        OwnerStateStore::with_notifier(Arc::new(transport), Arc::new(notifier)),
        rx,
    ))
}

/// Print success notifications; a failure is reported once, as the error.
fn finish(store: &OwnerStateStore, mut rx: UnboundedReceiver<Notification>, ok: bool) -> anyhow::Result<()> {
    while let Ok(note) = rx.try_recv() {
        if note.level == Level::Success {
            println!("{} {}", "✓".green().bold(), note.message);
        }
    }
    if ok {
        return Ok(());
    }
    let message = store
        .snapshot()
        .error
        .unwrap_or_else(|| "request failed".to_string());
    anyhow::bail!(message)
}

fn print_owner(owner: &OwnerProjection, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(owner)?),
        OutputFormat::Text => {
            println!("  Id: {}", owner.id.to_string().yellow());
            println!("  HN: {}", owner.hn.bold());
            println!("  Name: {}", owner.full_name());
            println!("  Phone: {}", owner.phone);
            println!("  Email: {}", owner.email.blue());
        }
    }
    Ok(())
}

async fn cmd_list(args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut pager = Paginator::new(args.page_size)?;
    let (store, rx) = connect(&args.remote)?;
    let ok = store.fetch_all().await;
    finish(&store, rx, ok)?;

    let state = store.snapshot();
    pager.go_to(args.page, state.records.len());
    let page = pager.view(&state.records);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(page.items)?);
        return Ok(());
    }
    if page.total_items == 0 {
        println!("No owners.");
        return Ok(());
    }
    println!(
        "{:<36}  {:<10}  {:<24}  {:<14}  {}",
        "ID".bold(),
        "HN".bold(),
        "NAME".bold(),
        "PHONE".bold(),
        "EMAIL".bold()
    );
    for owner in page.items {
        let name = owner.full_name();
        println!(
            "{:<36}  {:<10}  {:<24}  {:<14}  {}",
            owner.id.to_string().yellow(),
            owner.hn,
            name,
            owner.phone,
            owner.email
        );
    }
    println!("{}", page.summary().dimmed());
    Ok(())
}

async fn cmd_create(args: CreateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (store, rx) = connect(&args.remote)?;
    let ok = store.create_one(args.fields.into_draft()).await;
    finish(&store, rx, ok)?;
    if let Some(owner) = store.snapshot().records.last() {
        print_owner(owner, format)?;
    }
    Ok(())
}

async fn cmd_update(args: UpdateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let id: OwnerId = args.id.parse()?;
    let patch = args.fields.into_patch();
    if patch.is_empty() {
        anyhow::bail!("nothing to update; pass at least one field flag");
    }
    let (store, rx) = connect(&args.remote)?;
    // Fetch first so the updated record lands in the cache and can be shown.
    let ok = store.fetch_all().await && store.update_one(&id, patch).await;
    finish(&store, rx, ok)?;
    if let Some(owner) = store.snapshot().records.iter().find(|o| o.id == id) {
        print_owner(owner, format)?;
    }
    Ok(())
}

async fn cmd_delete(args: DeleteArgs) -> anyhow::Result<()> {
    let id: OwnerId = args.id.parse()?;
    let (store, rx) = connect(&args.remote)?;
    let ok = store.delete_one(&id).await;
    finish(&store, rx, ok)
}

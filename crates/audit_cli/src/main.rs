mod cli;
mod config;
mod render;
mod runner;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use audit_core::{ScanRequest, Timeline, ViewPhase};
use audit_engine::{
    CredentialProvider, EngineHandle, EnvCredential, ReqwestTransport, StaticCredential,
};
use audit_logging::audit_info;
use clap::Parser;

use crate::cli::Args;

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    audit_logging::initialize(args.log_destination(), args.log_level(), &args.log_file);

    let file_settings = config::load_settings(&args.config);
    let settings = file_settings.client_settings(args.base_url.as_deref());
    let lang = args
        .lang
        .clone()
        .or(file_settings.lang.clone())
        .unwrap_or_else(|| audit_core::DEFAULT_LANG.to_string());

    let credentials: Arc<dyn CredentialProvider> = match &args.token {
        Some(token) => Arc::new(StaticCredential::new(Some(token.clone()))),
        None => Arc::new(EnvCredential::default()),
    };
    let transport = ReqwestTransport::new(settings, credentials)
        .context("failed to build http client")?;
    let engine = EngineHandle::new(Arc::new(transport), Timeline::comparative())
        .context("failed to start engine runtime")?;

    let request = ScanRequest::new(args.url.clone())
        .with_competitor(args.competitor.clone())
        .with_lang(lang);
    audit_info!("Scan requested: {:?}", request.mode());

    let stdout = std::io::stdout();
    let state = runner::run_scan(&engine, request, &mut stdout.lock(), args.json)?;

    Ok(match state.phase() {
        ViewPhase::Results => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

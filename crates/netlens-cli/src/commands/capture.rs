use anyhow::{Result, anyhow};
use colored::Colorize;
use netlens_application::CaptureService;
use netlens_core::NetlensError;
use netlens_core::capture::{CaptureRequest, UploadRequest};
use std::path::PathBuf;

use super::Context;
use crate::output::size_label;

pub async fn interfaces(ctx: &Context) -> Result<()> {
    let service = CaptureService::new(ctx.api.clone());
    let interfaces = service.interfaces().await?;
    if interfaces.is_empty() {
        println!("No hay interfaces disponibles");
    }
    for interface in interfaces {
        println!(
            "{:<12} {:<16} {}",
            interface.id.bold(),
            interface.name,
            interface.description.unwrap_or_default().bright_black()
        );
    }
    Ok(())
}

pub async fn capture(
    ctx: &Context,
    interface: String,
    duration: u32,
    packet_count: Option<u32>,
) -> Result<()> {
    let service = CaptureService::new(ctx.api.clone());
    let mut request = CaptureRequest::new(interface, duration);
    if let Some(count) = packet_count {
        request = request.with_packet_count(count);
    }

    println!("Capturando en {} durante {} s...", request.interface_id, duration);
    let result = service.start_capture(&request).await?;

    if let Some(message) = &result.message {
        println!("{}", message.green());
    }
    if let Some(file) = &result.file_name {
        println!("Archivo: {file}");
    }
    if let Some(session_id) = result.session_id {
        println!("Sesión: {session_id}");
    }
    Ok(())
}

pub async fn files(ctx: &Context) -> Result<()> {
    let service = CaptureService::new(ctx.api.clone());
    for file in service.files().await? {
        let size = file
            .size
            .map(|bytes| size_label(bytes as f64 / 1024.0))
            .unwrap_or_default();
        println!(
            "{:<40} {:>12}  {}",
            file.name,
            size,
            file.created_at.unwrap_or_default().bright_black()
        );
    }
    Ok(())
}

pub async fn upload(
    ctx: &Context,
    path: PathBuf,
    process: bool,
    interface: Option<String>,
) -> Result<()> {
    let service = CaptureService::new(ctx.api.clone());
    let mut request = UploadRequest::new(path).process_now(process);
    if let Some(interface) = interface {
        request = request.with_interface(interface);
    }

    match service.upload(&request).await {
        Ok(result) => {
            let message = result
                .message
                .unwrap_or_else(|| format!("Archivo {} subido", result.file_name));
            println!("{}", message.green());
            if result.processing == Some(true) {
                println!("{}", "El archivo se está procesando.".bright_black());
            }
            Ok(())
        }
        // Conflicts and local validation are worded for the operator already.
        Err(err) if err.is_conflict() || matches!(err, NetlensError::InvalidInput(_)) => {
            Err(anyhow!(err.user_message("Error al subir el archivo.")))
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn process(ctx: &Context, file_path: &str, interface: Option<&str>) -> Result<()> {
    let service = CaptureService::new(ctx.api.clone());
    let result = service.process_file(file_path, interface).await?;
    println!(
        "{}",
        result
            .message
            .unwrap_or_else(|| format!("Procesando {file_path}"))
            .green()
    );
    Ok(())
}

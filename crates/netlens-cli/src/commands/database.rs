use anyhow::Result;
use colored::Colorize;
use netlens_application::workspace::{ANALYTICS_FAILED, DETAIL_FAILED, SESSIONS_FAILED};
use netlens_application::{
    AnomalyResource, CaptureService, PacketResource, PagedResource, PaginatedResourceFetcher,
};
use netlens_core::NetlensError;
use netlens_core::query::{FetchResult, FilterSet, PageState, QueryParams, ResourceKey};
use std::fmt::Display;

use super::Context;
use crate::output::{anomaly_row, packet_row, pagination_line, print_failure, size_label};
use crate::{PageArgs, SessionArgs};

pub async fn db_files(ctx: &Context) -> Result<()> {
    let files = CaptureService::new(ctx.api.clone()).db_files().await?;
    if files.is_empty() {
        println!("No hay bases de datos");
    }
    for file in files {
        println!("{:<40} {:>12}", file.name, size_label(file.size_kb));
    }
    Ok(())
}

pub async fn sessions(ctx: &Context, db_file: Option<String>) -> Result<()> {
    let list = match ctx.api.list_sessions(db_file.as_deref()).await {
        Ok(list) => list,
        Err(err) => {
            tracing::warn!(error = %err, "Listing sessions failed");
            print_failure(SESSIONS_FAILED);
            return Ok(());
        }
    };
    if list.sessions.is_empty() {
        println!("No hay sesiones de captura");
    }
    for session in list.sessions {
        println!(
            "{:>5}  {:<40} {:<20} {:>8} paquetes  {}",
            session.id.to_string().bold(),
            session.file_name,
            session.capture_date.unwrap_or_default(),
            session.packet_count.unwrap_or(0),
            session.interface.unwrap_or_default().bright_black(),
        );
    }
    Ok(())
}

pub async fn session(ctx: &Context, target: &SessionArgs) -> Result<()> {
    let key = resource_key(target);
    let detail = match ctx.api.session_detail(&key).await {
        Ok(detail) => detail,
        Err(err) => {
            tracing::warn!(error = %err, "Loading session failed");
            print_failure(DETAIL_FAILED);
            return Ok(());
        }
    };
    let session = &detail.session;
    println!("{}", format!("Sesión {}", session.id).bold());
    field("Archivo", &session.file_name);
    field("Fecha", session.capture_date.as_deref().unwrap_or("N/A"));
    field("Interfaz", session.interface.as_deref().unwrap_or("N/A"));
    field(
        "Paquetes",
        session
            .packet_count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    );
    for (name, value) in &detail.extra {
        field(name, value);
    }
    Ok(())
}

pub async fn packets(
    ctx: &Context,
    target: &SessionArgs,
    page: &PageArgs,
    filters: &[(&str, Option<String>)],
) -> Result<()> {
    let limit = page.limit.unwrap_or(ctx.config.browse.packet_page_size);
    let result = fetch_one(ctx, PacketResource, target, page, limit, filters).await?;
    print_page(&result, page, limit, packet_row);
    Ok(())
}

pub async fn anomalies(
    ctx: &Context,
    target: &SessionArgs,
    page: &PageArgs,
    filters: &[(&str, Option<String>)],
) -> Result<()> {
    let limit = page.limit.unwrap_or(ctx.config.browse.anomaly_page_size);
    let result = fetch_one(ctx, AnomalyResource, target, page, limit, filters).await?;
    print_page(&result, page, limit, anomaly_row);
    Ok(())
}

pub async fn analytics(ctx: &Context, target: &SessionArgs) -> Result<()> {
    let analytics = match ctx.api.session_analytics(&resource_key(target)).await {
        Ok(analytics) => analytics,
        Err(err) => {
            tracing::warn!(error = %err, "Loading analytics failed");
            print_failure(ANALYTICS_FAILED);
            return Ok(());
        }
    };

    println!("{}", format!("Análisis de la sesión {}", target.session).bold());
    field("Duración", analytics.duration_label());
    field("Paquetes", analytics.packet_count);
    field("Anomalías", analytics.total_anomalies());

    section("Protocolos");
    for entry in &analytics.protocols {
        println!("  {:<12} {:>8}", entry.protocol.as_deref().unwrap_or("N/A"), entry.count);
    }
    section("Comunicaciones principales");
    for entry in &analytics.top_communications {
        println!(
            "  {:<15} -> {:<15} {:>8}",
            entry.src_ip.as_deref().unwrap_or("-"),
            entry.dst_ip.as_deref().unwrap_or("-"),
            entry.count
        );
    }
    section("Puertos TCP");
    for entry in &analytics.tcp_ports {
        println!("  {:<8} {:>8}", entry.port, entry.count);
    }
    section("Puertos UDP");
    for entry in &analytics.udp_ports {
        println!("  {:<8} {:>8}", entry.port, entry.count);
    }
    section("Tipos ICMP");
    for entry in &analytics.icmp_types {
        println!("  {:<8} {:>8}", entry.icmp_type.to_string(), entry.count);
    }
    section("Anomalías por severidad");
    for entry in &analytics.anomalies.by_severity {
        println!("  {:<12} {:>8}", entry.severity, entry.count);
    }
    section("Anomalías por tipo");
    for entry in &analytics.anomalies.by_type {
        println!("  {:<24} {:>8}", entry.anomaly_type, entry.count);
    }
    Ok(())
}

fn resource_key(target: &SessionArgs) -> ResourceKey {
    ResourceKey::new(target.db_file.clone(), target.session.clone())
}

/// Runs a single page load through the same fetcher the browser uses, so
/// failures come back as the localized message.
async fn fetch_one<R: PagedResource>(
    ctx: &Context,
    resource: R,
    target: &SessionArgs,
    page: &PageArgs,
    limit: u32,
    filters: &[(&str, Option<String>)],
) -> Result<FetchResult<R::Item>> {
    let filters: FilterSet = filters
        .iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| (k.to_string(), v.clone())))
        .collect();
    let state = PageState::new(limit);
    let params = QueryParams {
        limit: state.limit(),
        offset: page_offset(page.page, state.limit())?,
        filters,
    };
    let fetcher = PaginatedResourceFetcher::new(ctx.api.clone(), resource);
    fetcher.load(Some(resource_key(target)), params).await;
    Ok(fetcher.result())
}

/// Row offset of `page`; pages past `u64::MAX` rows are refused.
fn page_offset(page: u64, limit: u32) -> netlens_core::Result<u64> {
    page.checked_mul(u64::from(limit))
        .ok_or_else(|| NetlensError::invalid_input(format!("Página fuera de rango: {page}")))
}

fn print_page<T>(result: &FetchResult<T>, page: &PageArgs, limit: u32, row: fn(&T) -> String) {
    if let Some(error) = &result.error {
        print_failure(error);
        return;
    }
    if result.items.is_empty() {
        println!("Sin resultados");
    }
    for item in &result.items {
        println!("{}", row(item));
    }
    let mut state = PageState::new(limit);
    state.go_to(page.page, result.total);
    println!("{}", pagination_line(&state, result.total).bright_black());
}

fn field(name: &str, value: impl Display) {
    println!("  {:<12} {}", format!("{name}:").bright_black(), value);
}

fn section(title: &str) {
    println!();
    println!("{}", title.bold().underline());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(0, 20).unwrap(), 0);
        assert_eq!(page_offset(3, 20).unwrap(), 60);
    }

    #[test]
    fn test_page_offset_overflow_is_invalid_input() {
        let err = page_offset(u64::MAX, 20).unwrap_err();
        assert!(matches!(err, NetlensError::InvalidInput(_)));
        assert_eq!(
            err.user_message("Error al cargar los paquetes."),
            format!("Página fuera de rango: {}", u64::MAX)
        );
    }
}

//! Renderers for a generated [`Report`].
//!
//! Every renderer reads the rows of the report it is given and never
//! re-aggregates the underlying records.

use crate::engine::{Granularity, Report};
use crate::error::Result;
use crate::format::{format_kwanza, format_percent};
use crate::summary::ProductionSummary;
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt::Write as _;
use std::io;

pub const CSV_HEADERS: [&str; 10] = [
    "Período",
    "Ciclos de Produção",
    "Área (ha)",
    "Custo de Produção (AOA)",
    "Rendimento (kg)",
    "Vendas (AOA)",
    "Quantidade Vendida (kg)",
    "Custos Operacionais (AOA)",
    "Lucro (AOA)",
    "Margem (%)",
];

/// Writes one CSV record per report row, in report order.
pub fn write_csv<W: io::Write>(report: &Report, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;

    for row in &report.rows {
        csv_writer.write_record([
            row.label.clone(),
            row.production.cycles.to_string(),
            row.production.area.to_string(),
            row.production.cost.to_string(),
            row.production.yield_kg.to_string(),
            row.sales.value.to_string(),
            row.sales.quantity.to_string(),
            row.costs.value.to_string(),
            row.profit.to_string(),
            format!("{:.2}", row.margin),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(report: &Report) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(report, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// `relatorio-mensal-2024-06-15.csv` style names.
pub fn export_file_name(granularity: Granularity, date: NaiveDate, extension: &str) -> String {
    format!(
        "relatorio-{}-{}.{}",
        granularity.file_tag(),
        date.format("%Y-%m-%d"),
        extension
    )
}

/// Printable Markdown version of the report with a whole-book summary on top.
pub fn render_printable(
    report: &Report,
    summary: &ProductionSummary,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Sistema de Gestão Agrícola");
    let _ = writeln!(output, "## Relatório {}", report.granularity.display_name());
    let _ = writeln!(
        output,
        "Gerado em: {}",
        generated_at.format("%d/%m/%Y %H:%M:%S")
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "### Resumo Geral");
    let _ = writeln!(output, "| Indicador | Valor |");
    let _ = writeln!(output, "|---|---|");
    let _ = writeln!(output, "| Ciclos Ativos | {} |", summary.active_cycles);
    let _ = writeln!(output, "| Área Total | {} ha |", summary.total_area);
    let _ = writeln!(output, "| Produção Total | {} kg |", summary.total_yield);
    let _ = writeln!(
        output,
        "| Receita Total | {} |",
        format_kwanza(summary.total_revenue)
    );
    let _ = writeln!(
        output,
        "| Lucro Líquido | {} |",
        format_kwanza(summary.profit)
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "### Dados por Período");
    if report.rows.is_empty() {
        let _ = writeln!(output, "Sem dados para este período.");
        return output;
    }

    let _ = writeln!(output, "| Período | Produção | Vendas | Custos | Lucro | Margem |");
    let _ = writeln!(output, "|---|---|---|---|---|---|");
    for row in &report.rows {
        let _ = writeln!(
            output,
            "| {} | {} ciclos, {} ha | {}, {} kg | {} | {} | {} |",
            row.label,
            row.production.cycles,
            row.production.area,
            format_kwanza(row.sales.value),
            row.sales.quantity,
            format_kwanza(row.costs.value),
            format_kwanza(row.profit),
            format_percent(row.margin, 1)
        );
    }

    output
}

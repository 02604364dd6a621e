use chrono::{NaiveDate, TimeZone, Utc};
use crop_cycle_reports::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn partner(id: &str, name: &str, role: PartnerRole) -> Partner {
    Partner {
        id: id.to_string(),
        name: name.to_string(),
        role,
        contact: String::new(),
        email: String::new(),
        address: String::new(),
        specialization: None,
        notes: String::new(),
        created_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn txn(
    id: &str,
    kind: TransactionKind,
    on: NaiveDate,
    amount: f64,
    quantity: Option<f64>,
    status: TransactionStatus,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        kind,
        production_cycle_id: None,
        partner_id: "coop".to_string(),
        amount,
        quantity,
        coffee_type: None,
        description: String::new(),
        date: on,
        status,
        notes: String::new(),
    }
}

/// A farm with cycles and transactions spread over 2022-2024.
fn coffee_farm() -> RecordBook {
    let created = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
    let mut book = RecordBook::new();

    book.add_partner(partner("coop", "Cooperativa do Uíge", PartnerRole::Client));
    book.add_partner(partner("agro", "Agro Insumos Lda", PartnerRole::Supplier));

    let mut north = ProductionCycle::new("north", "Café", "Arábica", 4.0, date(2024, 1, 15), 6000.0, created);
    for (stage, cost) in [
        (ProductionStage::Nursery, 1200.0),
        (ProductionStage::Planting, 800.0),
        (ProductionStage::Weeding, 300.0),
        (ProductionStage::Pruning, 250.0),
    ] {
        north.apply_stage_update(
            stage,
            StageUpdate {
                start_date: Some(date(2024, 1, 15)),
                end_date: Some(date(2024, 2, 15)),
                cost,
                ..Default::default()
            },
        );
    }
    north.apply_stage_update(
        ProductionStage::Harvest,
        StageUpdate {
            start_date: Some(date(2024, 5, 1)),
            end_date: Some(date(2024, 5, 20)),
            cost: 450.0,
            yield_kg: 5200.0,
            ..Default::default()
        },
    );
    book.add_cycle(north);

    let mut south = ProductionCycle::new("south", "Café", "Robusta", 2.5, date(2024, 6, 1), 3000.0, created);
    south.apply_stage_update(
        ProductionStage::Nursery,
        StageUpdate {
            start_date: Some(date(2024, 6, 1)),
            cost: 1000.0,
            ..Default::default()
        },
    );
    book.add_cycle(south);

    let old = ProductionCycle::new("old", "Café", "Arábica", 1.0, date(2022, 3, 1), 800.0, created);
    book.add_cycle(old);

    for t in [
        txn("s1", TransactionKind::Sale, date(2024, 6, 10), 5000.0, Some(100.0), TransactionStatus::Completed),
        txn("s2", TransactionKind::Sale, date(2024, 5, 25), 12000.0, Some(400.0), TransactionStatus::Completed),
        txn("s3", TransactionKind::Sale, date(2024, 5, 26), 9999.0, Some(50.0), TransactionStatus::Pending),
        txn("s4", TransactionKind::Sale, date(2024, 4, 2), 700.0, None, TransactionStatus::Completed),
        txn("c1", TransactionKind::ProductionCost, date(2024, 6, 5), 800.0, None, TransactionStatus::Completed),
        txn("c2", TransactionKind::Financing, date(2024, 2, 1), 2000.0, None, TransactionStatus::Completed),
        txn("c3", TransactionKind::ProductionCost, date(2024, 3, 1), 9999.0, None, TransactionStatus::Cancelled),
        txn("p1", TransactionKind::Purchase, date(2024, 6, 2), 600.0, Some(20.0), TransactionStatus::Completed),
        txn("r1", TransactionKind::Collection, date(2024, 6, 3), 450.0, Some(30.0), TransactionStatus::Completed),
        txn("s5", TransactionKind::Sale, date(2022, 8, 1), 3000.0, Some(90.0), TransactionStatus::Completed),
    ] {
        book.add_transaction(t);
    }

    book
}

#[test]
fn test_row_counts_for_every_granularity() {
    let book = coffee_farm();
    for (granularity, expected) in [
        (Granularity::Daily, 30),
        (Granularity::Monthly, 12),
        (Granularity::Yearly, 5),
    ] {
        let rows = generate(&book.cycles, &book.transactions, granularity, date(2024, 6, 15)).unwrap();
        assert_eq!(rows.len(), expected, "{} window", granularity);

        let periods: Vec<Period> = rows.iter().map(|r| r.period).collect();
        let mut sorted = periods.clone();
        sorted.sort();
        sorted.reverse();
        assert_eq!(periods, sorted, "{} rows must be newest first", granularity);
    }
}

#[test]
fn test_profit_identity_and_zero_sales_margin() {
    let book = coffee_farm();
    for granularity in [Granularity::Daily, Granularity::Monthly, Granularity::Yearly] {
        let rows = generate(&book.cycles, &book.transactions, granularity, date(2024, 6, 15)).unwrap();
        for row in rows {
            assert_eq!(
                row.profit,
                row.sales.value - row.costs.value - row.production.cost
            );
            if row.sales.value == 0.0 {
                assert_eq!(row.margin, 0.0);
            }
            assert!(row.margin.is_finite());
        }
    }
}

#[test]
fn test_monthly_report_for_coffee_farm() {
    let book = coffee_farm();
    let config = ReportConfig::parse("monthly", "2024-06-15").unwrap();
    let report = ReportProcessor::process(&book, &config).unwrap();

    let june = &report.rows[0];
    assert_eq!(june.label, "Junho 2024");
    assert_eq!(june.production.cycles, 1);
    assert_eq!(june.production.area, 2.5);
    assert_eq!(june.production.cost, 1000.0);
    assert_eq!(june.sales.value, 5000.0);
    assert_eq!(june.sales.quantity, 100.0);
    // Purchase and collection in June are not costs
    assert_eq!(june.costs.value, 800.0);
    assert_eq!(june.costs.count, 1);
    assert_eq!(june.profit, 3200.0);
    assert!((june.margin - 64.0).abs() < 1e-9);

    let may = &report.rows[1];
    assert_eq!(may.sales.value, 12000.0);
    assert_eq!(may.sales.count, 1);
    assert_eq!(may.production.cycles, 0);

    let april = &report.rows[2];
    assert_eq!(april.sales.quantity, 0.0);
    assert_eq!(april.sales.value, 700.0);

    let january = &report.rows[5];
    assert_eq!(january.label, "Janeiro 2024");
    assert_eq!(january.production.cost, 3000.0);
    assert_eq!(january.production.yield_kg, 5200.0);
    assert_eq!(january.profit, -3000.0);
    assert_eq!(january.margin, 0.0);

    // The pending 9999 sale and the cancelled 9999 cost never appear
    assert!(report.rows.iter().all(|r| r.sales.value != 9999.0 + 12000.0));
    assert!(report.rows.iter().all(|r| r.costs.value < 9999.0));
}

#[test]
fn test_yearly_report_excludes_cycles_outside_window() {
    let book = coffee_farm();
    let rows = generate(&book.cycles, &book.transactions, Granularity::Yearly, date(2024, 6, 15)).unwrap();

    let y2024 = &rows[0];
    assert_eq!(y2024.production.cycles, 2);
    assert_eq!(y2024.production.cost, 4000.0);
    assert_eq!(y2024.sales.value, 17700.0);
    assert_eq!(y2024.costs.value, 2800.0);

    let y2022 = rows.iter().find(|r| r.period == Period::Year(2022)).unwrap();
    assert_eq!(y2022.production.cycles, 1);
    assert_eq!(y2022.sales.value, 3000.0);

    // A monthly window ending June 2024 starts in July 2023: the 2022 cycle is dropped
    let monthly = generate(&book.cycles, &book.transactions, Granularity::Monthly, date(2024, 6, 15)).unwrap();
    let bucketed: usize = monthly.iter().map(|r| r.production.cycles).sum();
    assert_eq!(bucketed, 2);
    let bucketed_cost: f64 = monthly.iter().map(|r| r.production.cost).sum();
    assert_eq!(bucketed_cost, 4000.0);
}

#[test]
fn test_daily_report_window() {
    let book = coffee_farm();
    let rows = generate(&book.cycles, &book.transactions, Granularity::Daily, date(2024, 6, 15)).unwrap();

    assert_eq!(rows[0].period.to_string(), "2024-06-15");
    assert_eq!(rows[29].period.to_string(), "2024-05-17");

    let sale_day = rows.iter().find(|r| r.label == "10/06/2024").unwrap();
    assert_eq!(sale_day.sales.value, 5000.0);

    let may_25 = rows.iter().find(|r| r.period.to_string() == "2024-05-25").unwrap();
    assert_eq!(may_25.sales.value, 12000.0);

    // Pending sale on the 26th contributes nothing
    let may_26 = rows.iter().find(|r| r.period.to_string() == "2024-05-26").unwrap();
    assert_eq!(may_26.sales.value, 0.0);
    assert_eq!(may_26.sales.count, 0);
}

#[test]
fn test_generation_is_idempotent_and_read_only() {
    let book = coffee_farm();
    let snapshot = book.clone();

    let first = generate(&book.cycles, &book.transactions, Granularity::Monthly, date(2024, 6, 15)).unwrap();
    let second = generate(&book.cycles, &book.transactions, Granularity::Monthly, date(2024, 6, 15)).unwrap();

    assert_eq!(first, second);
    assert_eq!(book, snapshot);
}

#[test]
fn test_empty_book_yields_zero_rows() {
    let rows = generate(&[], &[], Granularity::Monthly, date(2024, 1, 31)).unwrap();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0].label, "Janeiro 2024");
    assert_eq!(rows[11].label, "Fevereiro 2023");
    for row in rows {
        assert_eq!(row.production, ProductionTotals::default());
        assert_eq!(row.sales, SalesTotals::default());
        assert_eq!(row.costs, CostTotals::default());
        assert_eq!(row.profit, 0.0);
        assert_eq!(row.margin, 0.0);
    }
}

#[test]
fn test_exports_share_report_rows() -> anyhow::Result<()> {
    let book = coffee_farm();
    let config = ReportConfig::parse("anual", "2024-06-15")?;
    let report = ReportProcessor::process(&book, &config)?;
    let summary = ReportProcessor::summarize(&book);

    let csv_text = to_csv_string(&report)?;
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let records: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;
    assert_eq!(records.len(), report.rows.len());
    for (record, row) in records.iter().zip(&report.rows) {
        assert_eq!(&record[0], row.label);
        assert_eq!(record[8].parse::<f64>()?, row.profit);
    }

    let printable = render_printable(&report, &summary, Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
    assert!(printable.contains("Relatório Anual"));
    for row in &report.rows {
        assert!(printable.contains(&format!("| {} |", row.label)));
        assert!(printable.contains(&format_kwanza(row.profit)));
    }

    assert_eq!(
        export_file_name(report.granularity, report.reference_date, "csv"),
        "relatorio-anual-2024-06-15.csv"
    );
    Ok(())
}

#[test]
fn test_summary_over_whole_book() {
    let summary = ReportProcessor::summarize(&coffee_farm());

    assert_eq!(summary.total_cycles, 3);
    assert_eq!(summary.completed_cycles, 1);
    assert_eq!(summary.active_cycles, 2);
    assert_eq!(summary.total_area, 7.5);
    assert_eq!(summary.total_cost, 4000.0);
    assert_eq!(summary.total_yield, 5200.0);
    assert_eq!(summary.total_revenue, 20700.0);
    assert_eq!(summary.profit, 16700.0);
}

#[test]
fn test_record_book_save_and_load() -> anyhow::Result<()> {
    let book = coffee_farm();
    let path = std::env::temp_dir().join(format!(
        "crop-cycle-reports-{}.json",
        std::process::id()
    ));

    book.save(&path)?;
    let restored = RecordBook::load(&path)?;
    std::fs::remove_file(&path)?;

    assert_eq!(restored, book);
    assert_eq!(
        restored.cycle("north").map(|c| c.current_stage),
        Some(ProductionStage::Harvest)
    );
    Ok(())
}

#[test]
fn test_filters_on_record_book() {
    let book = coffee_farm();

    let robusta = filter_cycles(&book.cycles, "robusta", None);
    assert_eq!(robusta.len(), 1);
    assert_eq!(robusta[0].id, "south");

    let coop_sales = filter_transactions(&book.transactions, &book.partners, "uíge", Some(TransactionKind::Sale));
    assert_eq!(coop_sales.len(), 5);

    let suppliers = filter_partners(&book.partners, "", Some(PartnerRole::Supplier));
    assert_eq!(suppliers[0].id, "agro");
}

#[test]
fn test_unsupported_granularity_is_rejected() {
    let err = ReportConfig::parse("weekly", "2024-06-15").unwrap_err();
    assert!(matches!(err, ReportError::UnsupportedGranularity(ref g) if g == "weekly"));
}

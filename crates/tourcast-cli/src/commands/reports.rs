//! Report command implementations

use anyhow::Result;
use tourcast_core::insights::{format_amount, Alert, AlertKind, HealthScore, Prediction, PredictionMetric};
use tourcast_core::{IntelligenceReport, Snapshot};

use super::{print_json, truncate, Inputs};

pub fn cmd_summary(inputs: &Inputs, json: bool) -> Result<()> {
    let report = inputs.report();
    if json {
        return print_json(&report.snapshot);
    }
    print_summary(&report.snapshot);
    Ok(())
}

pub fn cmd_health(inputs: &Inputs, json: bool) -> Result<()> {
    let report = inputs.report();
    if json {
        return print_json(&report.health);
    }
    print_health(&report.health);
    Ok(())
}

pub fn cmd_alerts(inputs: &Inputs, json: bool) -> Result<()> {
    let report = inputs.report();
    if json {
        return print_json(&report.alerts);
    }
    print_alerts(&report.alerts);
    Ok(())
}

pub fn cmd_predict(inputs: &Inputs, json: bool) -> Result<()> {
    let report = inputs.report();
    if json {
        return print_json(&report.predictions);
    }
    print_predictions(&report.predictions);
    Ok(())
}

pub fn cmd_commissions(inputs: &Inputs, show_id: Option<&str>, json: bool) -> Result<()> {
    let report = inputs.report();

    if let Some(show_id) = show_id {
        let Some(net) = report.net_for(show_id) else {
            anyhow::bail!("Show not found: {}", show_id);
        };
        if json {
            return print_json(net);
        }

        let b = &net.breakdown;
        println!();
        println!("🧾 Net for {}", net.show_id);
        println!("   ─────────────────────────────────────────────────────────────");
        println!("   Gross:        {:>12}", format_amount(b.gross));
        println!("   Withholding:  {:>12}", format_amount(-b.withholding));
        for line in &net.commissions {
            println!(
                "   {:13} {:>12}   ({} {:.1}%)",
                truncate(&line.agency_name, 13),
                format_amount(-line.amount),
                line.agency_type,
                line.pct
            );
        }
        println!("   Costs:        {:>12}", format_amount(-b.costs));
        println!("   Net:          {:>12}", format_amount(b.net));
        return Ok(());
    }

    if json {
        return print_json(&serde_json::json!({
            "commissionsByAgency": report.commissions_by_agency,
            "nets": report.nets,
        }));
    }
    print_commissions(inputs, &report);
    Ok(())
}

pub fn cmd_report(inputs: &Inputs, json: bool) -> Result<()> {
    let report = inputs.report();
    if json {
        return print_json(&report);
    }

    print_summary(&report.snapshot);
    print_health(&report.health);
    print_alerts(&report.alerts);
    print_predictions(&report.predictions);
    print_commissions(inputs, &report);
    Ok(())
}

fn print_summary(snapshot: &Snapshot) {
    println!();
    println!("📊 Revenue Outlook");
    println!("   As of {}", snapshot.now.format("%Y-%m-%d %H:%M UTC"));
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:>6} │ {:>5} │ {:>12} │ {:>12} │ {:>9}",
        "Window", "Shows", "Expected", "Confirmed", "C/P/O"
    );
    println!("   ───────┼───────┼──────────────┼──────────────┼──────────");
    for window in &snapshot.windows {
        println!(
            "   {:>5}d │ {:>5} │ {:>12} │ {:>12} │ {:>9}",
            window.days,
            window.shows,
            format_amount(window.expected_revenue),
            format_amount(window.confirmed_revenue),
            format!("{}/{}/{}", window.confirmed, window.pending, window.offer)
        );
    }

    println!();
    println!(
        "   Last {} days: {} shows, {} confirmed",
        snapshot.trailing.days,
        snapshot.trailing.shows,
        format_amount(snapshot.trailing.revenue)
    );
    let arrow = if snapshot.growth_pct > 0.0 {
        "📈"
    } else if snapshot.growth_pct < 0.0 {
        "📉"
    } else {
        "➡️"
    };
    println!(
        "   {} Next {} days vs last: {:+.1}%",
        arrow, snapshot.forward.days, snapshot.growth_pct
    );

    if snapshot.archived_shows > 0 {
        println!("   Archived: {}", snapshot.archived_shows);
    }
    if !snapshot.excluded.is_empty() {
        println!(
            "   ⚠️  Skipped {} show(s) with unreadable dates: {}",
            snapshot.excluded.len(),
            snapshot.excluded.join(", ")
        );
    }
}

fn print_health(health: &HealthScore) {
    let f = &health.factors;
    println!();
    println!("🩺 Pipeline Health: {}/100 ({}, {})", health.score, health.grade, health.status);
    println!("   ─────────────────────────────────────────────────────────────");
    for (label, factor) in [
        ("Booking rate", &f.booking_rate),
        ("Revenue health", &f.revenue_health),
        ("Conversion", &f.conversion),
        ("Timing", &f.timing),
    ] {
        println!(
            "   {:15} {:>5.1} / {:<4} ({:>3}%)",
            label, factor.points, factor.max_points, factor.percent
        );
    }

    if !health.insights.is_empty() {
        println!();
        for (insight, recommendation) in health.insights.iter().zip(&health.recommendations) {
            println!("   • {}", insight);
            println!("     → {}", recommendation);
        }
    }
}

fn print_alerts(alerts: &[Alert]) {
    println!();
    println!("🔔 Alerts");
    println!("   ─────────────────────────────────────────────────────────────");
    if alerts.is_empty() {
        println!("   ✅ Nothing needs attention.");
        return;
    }

    for alert in alerts {
        let icon = match alert.kind {
            AlertKind::Critical => "🚨",
            AlertKind::Warning => "⚠️ ",
            AlertKind::Opportunity => "💰",
            AlertKind::Info => "ℹ️ ",
        };
        println!("   {} {} [{} impact]", icon, alert.title, alert.impact);
        println!("      {}", alert.message);
        if let Some(action) = &alert.action {
            println!("      → {} ({})", action.label, action.target);
        }
    }
}

fn print_predictions(predictions: &[Prediction]) {
    println!();
    println!("🔮 Predictions");
    println!("   ─────────────────────────────────────────────────────────────");
    for prediction in predictions {
        let value = |v: f64| match prediction.metric {
            PredictionMetric::ShowCount90d => format!("{:.0}", v),
            _ => format_amount(v),
        };
        println!(
            "   {:15} {:>12} → {:>12}   {:6} {:>3.0}% confidence",
            prediction.metric.label(),
            value(prediction.current),
            value(prediction.predicted),
            prediction.trend.as_str(),
            prediction.confidence * 100.0
        );
    }
}

fn print_commissions(inputs: &Inputs, report: &IntelligenceReport) {
    println!();
    println!("🤝 Commissions");
    println!("   ─────────────────────────────────────────────────────────────");
    if inputs.roster.is_empty() {
        println!("   No agencies configured (use --agencies).");
    } else {
        for agency in inputs.roster.iter() {
            let total = report
                .commissions_by_agency
                .get(&agency.id)
                .copied()
                .unwrap_or(0.0);
            println!(
                "   {:25} {:10} {:>5.1}% {:>12}",
                truncate(&agency.name, 25),
                agency.agency_type.as_str(),
                agency.commission_pct(),
                format_amount(total)
            );
        }
    }

    if report.nets.is_empty() {
        return;
    }
    println!();
    println!(
        "   {:20} │ {:>10} │ {:>10} │ {:>10}",
        "Show", "Gross", "Deductions", "Net"
    );
    println!("   ─────────────────────┼────────────┼────────────┼───────────");
    for net in &report.nets {
        let b = &net.breakdown;
        println!(
            "   {:20} │ {:>10} │ {:>10} │ {:>10}",
            truncate(&net.show_id, 20),
            format_amount(b.gross),
            format_amount(b.withholding + b.commission + b.costs),
            format_amount(b.net)
        );
    }
}

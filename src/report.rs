// Price comparison table built from the best matches
use crate::model::MatchedProduct;
use tracing::{info, warn};

pub const REPORT_FILE: &str = "final_prices.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct PriceReport {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

struct ReportEntry {
    code: String,
    name: String,
    // (price, supplier label)
    prices: Vec<(u32, String)>,
}

/// Median of the scores; the mean of the two middle values for an even count.
pub fn median(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Keeps matches scoring at or above the median and lays them out one row per store
/// code: `code, name, (supplier, price)*` with the cheapest supplier first.
pub fn build_report(matches: &[MatchedProduct]) -> PriceReport {
    let scores: Vec<f64> = matches.iter().map(|m| m.match_score).collect();
    let Some(threshold) = median(&scores) else {
        warn!("No matches, report will only contain headers");
        return PriceReport {
            headers: headers(0),
            rows: Vec::new(),
        };
    };
    info!("Median score: {:.2}", threshold);

    let mut entries: Vec<ReportEntry> = Vec::new();
    for matched in matches.iter().filter(|m| m.match_score >= threshold) {
        let store = &matched.store_product;
        let supplier = &matched.supplier_product;

        let idx = match entries.iter().position(|e| e.code == store.code) {
            Some(idx) => idx,
            None => {
                entries.push(ReportEntry {
                    code: store.code.clone(),
                    name: store.name.clone(),
                    prices: Vec::new(),
                });
                entries.len() - 1
            }
        };

        let offer = (supplier.price, supplier.supplier_name.clone());
        if !entries[idx].prices.contains(&offer) {
            entries[idx].prices.push(offer);
        }
    }

    let max_suppliers = entries.iter().map(|e| e.prices.len()).max().unwrap_or(0);
    let headers = headers(max_suppliers);

    let rows = entries
        .into_iter()
        .map(|mut entry| {
            entry.prices.sort_by_key(|(price, _)| *price);
            let mut row = vec![entry.code, entry.name];
            for (price, supplier) in entry.prices {
                row.push(supplier);
                row.push(price.to_string());
            }
            row.resize(headers.len(), String::new());
            row
        })
        .collect();

    PriceReport { headers, rows }
}

fn headers(max_suppliers: usize) -> Vec<String> {
    let mut headers = vec!["Код".to_string(), "Название".to_string()];
    for i in 1..=max_suppliers {
        headers.push(format!("Поставщик {}", i));
        headers.push(format!("Цена {}", i));
    }
    headers
}

//! Terminal and JSON rendering of a WACC result.
//!
//! Formatting lives here so the pipeline stays presentation-free.

use crate::domain::{WaccRequest, WaccResult};
use crate::error::AppError;

/// Human-readable report for one computation.
pub fn format_result(request: &WaccRequest, result: &WaccResult) -> String {
    let d = &result.detail;
    let mut out = String::new();

    out.push_str("=== wacc - Weighted Average Cost of Capital ===\n");
    out.push_str(&format!("Activity: {}\n", request.activity));
    out.push_str(&format!(
        "Revenue: {:.2} | EV/Sales: {} | Company value: {:.2}\n",
        request.declared_revenue, d.ev_sales, d.valor_da_empresa
    ));
    out.push_str(&format!(
        "Tax regime: {}\n",
        if request.real_profit { "real profit" } else { "other (IR = 0)" }
    ));

    out.push_str("\nInputs (%):\n");
    out.push_str(&format!(
        "  RF={:.2}  RM={:.2}  CR={:.2}  IA={:.2}  IB={:.2}  CT={:.2}  IR={:.2}  Premio={:.2}\n",
        d.rf, d.rm, d.cr, d.ia, d.ib, d.ct, d.ir, d.premio
    ));
    out.push_str(&format!(
        "  Beta={:.4}  DE={:.4}  IPCAlongo={:.2}\n",
        d.beta, d.de, d.ipca_longo
    ));

    out.push_str("\nCost of equity:\n");
    out.push_str(&format!("  Betarealav   {:>10.4}\n", d.betarealav));
    out.push_str(&format!("  KEnomUS      {:>10.4}\n", d.custo_equity));
    out.push_str(&format!("  KEreal       {:>10.4}\n", d.ke_real));
    out.push_str(&format!("  KenomBR      {:>10.4}\n", d.kenom_br));

    out.push_str("\nCost of debt:\n");
    out.push_str(&format!("  KDnom        {:>10.4}\n", d.custo_debt));
    out.push_str(&format!("  KDreal       {:>10.4}\n", d.kd_real));

    out.push_str(&format!("\nWeights: equity={:.4} debt={:.4}\n", d.partke, d.partkd));
    out.push_str(&format!(
        "\nWACC nominal: {:.4}%\nWACC real:    {:.4}%\n",
        result.wacc_nominal * 100.0,
        result.wacc_real * 100.0
    ));

    out
}

/// Pretty JSON of the result (`wacc_nominal`, `wacc_real`, `detail`).
pub fn result_json(result: &WaccResult) -> Result<String, AppError> {
    serde_json::to_string_pretty(result).map_err(|e| AppError::new(5, format!("Failed to serialize result: {e}")))
}

/// Activity names, one per line.
pub fn format_activities(activities: &[String]) -> String {
    activities.join("\n")
}

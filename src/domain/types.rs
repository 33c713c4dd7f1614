//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the resolver and the formula engine
//! - printed or exported as JSON by the CLI
//! - compared in tests (results are plain `f64` aggregates)

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::WaccError;

/// The reference tables the calculator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableId {
    /// Per-activity risk parameters (`atividade, Beta, DE, EV/Sales`).
    Activities,
    /// Macro/WACC parameters (`Campo, Valor`).
    Parameters,
    /// IPCA inflation points (`indice, Valor`).
    Ipca,
    /// Size-premium bands (` De `, ` até `, `Premio`).
    SizePremium,
}

impl TableId {
    /// Human-readable label for messages.
    pub fn display_name(self) -> &'static str {
        match self {
            TableId::Activities => "activity",
            TableId::Parameters => "parameter",
            TableId::Ipca => "IPCA",
            TableId::SizePremium => "size premium",
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Field codes of the macro/WACC parameter table.
///
/// All values are percentages (e.g. `4,5` means 4.5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MacroField {
    /// Risk-free rate.
    Rf,
    /// Market risk premium.
    Rm,
    /// Country risk.
    Cr,
    /// US inflation.
    Ia,
    /// Brazilian inflation.
    Ib,
    /// Cost of debt (pre-tax).
    Ct,
    /// Income tax rate.
    Ir,
}

impl MacroField {
    pub const ALL: [MacroField; 7] = [
        MacroField::Rf,
        MacroField::Rm,
        MacroField::Cr,
        MacroField::Ia,
        MacroField::Ib,
        MacroField::Ct,
        MacroField::Ir,
    ];

    /// Value of the `Campo` column for this field.
    pub fn code(self) -> &'static str {
        match self {
            MacroField::Rf => "RF",
            MacroField::Rm => "RM",
            MacroField::Cr => "CR",
            MacroField::Ia => "IA",
            MacroField::Ib => "IB",
            MacroField::Ct => "CT",
            MacroField::Ir => "IR",
        }
    }
}

impl fmt::Display for MacroField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Index names of the five IPCA points averaged into the long-run inflation.
pub const IPCA_INDICES: [&str; 5] = ["IPCAano1", "IPCAano2", "IPCAano3", "IPCAano4", "IPCAano5"];

/// A normalized row of the activity table.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub activity_name: String,
    pub beta: f64,
    pub debt_to_equity: f64,
    pub ev_to_sales: f64,
}

/// The seven macro parameters, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroParameters {
    pub rf: f64,
    pub rm: f64,
    pub cr: f64,
    pub ia: f64,
    pub ib: f64,
    pub ct: f64,
    pub ir: f64,
}

impl MacroParameters {
    pub fn set(&mut self, field: MacroField, value: f64) {
        let slot = match field {
            MacroField::Rf => &mut self.rf,
            MacroField::Rm => &mut self.rm,
            MacroField::Cr => &mut self.cr,
            MacroField::Ia => &mut self.ia,
            MacroField::Ib => &mut self.ib,
            MacroField::Ct => &mut self.ct,
            MacroField::Ir => &mut self.ir,
        };
        *slot = value;
    }
}

/// One inclusive `[lower_bound, upper_bound]` size band and its premium (percent).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizePremiumBand {
    pub lower_bound: i64,
    pub upper_bound: i64,
    pub premium: f64,
}

impl SizePremiumBand {
    pub fn contains(&self, value: f64) -> bool {
        self.lower_bound as f64 <= value && value <= self.upper_bound as f64
    }
}

/// A validated WACC request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaccRequest {
    pub activity: String,
    pub declared_revenue: f64,
    /// `true` when the company is taxed under the "real profit" regime.
    pub real_profit: bool,
}

impl WaccRequest {
    /// Build a request, rejecting an empty activity and a negative or
    /// non-finite revenue.
    pub fn new(activity: impl Into<String>, declared_revenue: f64, real_profit: bool) -> Result<Self, WaccError> {
        let activity = activity.into().trim().to_string();
        if activity.is_empty() {
            return Err(WaccError::InvalidInput("activity must not be empty".to_string()));
        }
        if !declared_revenue.is_finite() || declared_revenue < 0.0 {
            return Err(WaccError::InvalidInput(format!(
                "revenue must be a finite, non-negative number (got {declared_revenue})"
            )));
        }
        Ok(Self {
            activity,
            declared_revenue,
            real_profit,
        })
    }
}

/// Everything the formula engine needs, already normalized to `f64`.
///
/// Macro fields and the premium are percentages; `ipca_longo` is a decimal
/// fraction; `ir` is already zeroed when the company is not under real profit.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParameters {
    pub activity: ActivityRecord,
    pub macros: MacroParameters,
    pub ipca_longo: f64,
    pub premium: f64,
    pub declared_revenue: f64,
    pub company_value: f64,
    pub real_profit: bool,
}

/// Full, unrounded output of the formula chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaccBreakdown {
    pub beta_realav: f64,
    pub ke_nom_us: f64,
    pub ke_real: f64,
    pub ke_nom_br: f64,
    pub kd_nom: f64,
    pub kd_real: f64,
    pub part_kd: f64,
    pub part_ke: f64,
    pub wacc_real: f64,
    pub wacc_nominal: f64,
}

impl WaccBreakdown {
    /// Named figures, in evaluation order.
    pub fn figures(&self) -> [(&'static str, f64); 10] {
        [
            ("Betarealav", self.beta_realav),
            ("KEnomUS", self.ke_nom_us),
            ("KEreal", self.ke_real),
            ("KenomBR", self.ke_nom_br),
            ("KDnom", self.kd_nom),
            ("KDreal", self.kd_real),
            ("partkd", self.part_kd),
            ("partke", self.part_ke),
            ("WaccReal", self.wacc_real),
            ("WaccNominal", self.wacc_nominal),
        ]
    }
}

/// Rounded diagnostics exposed alongside the WACC figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaccDetail {
    #[serde(rename = "Beta")]
    pub beta: f64,
    #[serde(rename = "DE")]
    pub de: f64,
    #[serde(rename = "RF")]
    pub rf: f64,
    #[serde(rename = "RM")]
    pub rm: f64,
    #[serde(rename = "CR")]
    pub cr: f64,
    #[serde(rename = "IA")]
    pub ia: f64,
    #[serde(rename = "IB")]
    pub ib: f64,
    #[serde(rename = "CT")]
    pub ct: f64,
    #[serde(rename = "IR")]
    pub ir: f64,
    #[serde(rename = "Premio")]
    pub premio: f64,
    #[serde(rename = "Custo_Equity")]
    pub custo_equity: f64,
    #[serde(rename = "Custo_Debt")]
    pub custo_debt: f64,
    pub partke: f64,
    pub partkd: f64,
    /// Not rounded.
    #[serde(rename = "EV_Sales")]
    pub ev_sales: f64,
    #[serde(rename = "Betarealav")]
    pub betarealav: f64,
    #[serde(rename = "KEreal")]
    pub ke_real: f64,
    #[serde(rename = "KenomBR")]
    pub kenom_br: f64,
    #[serde(rename = "KDreal")]
    pub kd_real: f64,
    #[serde(rename = "IPCAlongo")]
    pub ipca_longo: f64,
    #[serde(rename = "ValordaEmpresa")]
    pub valor_da_empresa: f64,
}

/// Result of one WACC computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaccResult {
    pub wacc_nominal: f64,
    pub wacc_real: f64,
    pub detail: WaccDetail,
}

/// Where the reference tables live.
///
/// Derived from CLI flags and environment (plus defaults).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub data_dir: PathBuf,
    pub activity_file: String,
    pub parameter_file: String,
    pub ipca_file: String,
    pub size_file: String,
}

impl TableConfig {
    pub const DEFAULT_DATA_DIR: &'static str = "data";
    pub const DEFAULT_ACTIVITY_FILE: &'static str = "Bd_Atividade.json";
    pub const DEFAULT_PARAMETER_FILE: &'static str = "BDWacc.json";
    pub const DEFAULT_IPCA_FILE: &'static str = "BDMacro2.json";
    pub const DEFAULT_SIZE_FILE: &'static str = "BDSize.json";

    pub fn file_name(&self, table: TableId) -> &str {
        match table {
            TableId::Activities => &self.activity_file,
            TableId::Parameters => &self.parameter_file,
            TableId::Ipca => &self.ipca_file,
            TableId::SizePremium => &self.size_file,
        }
    }

    pub fn path_for(&self, table: TableId) -> PathBuf {
        self.data_dir.join(self.file_name(table))
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(Self::DEFAULT_DATA_DIR),
            activity_file: Self::DEFAULT_ACTIVITY_FILE.to_string(),
            parameter_file: Self::DEFAULT_PARAMETER_FILE.to_string(),
            ipca_file: Self::DEFAULT_IPCA_FILE.to_string(),
            size_file: Self::DEFAULT_SIZE_FILE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_rejects_blank_activity_and_bad_revenue() {
        assert!(matches!(WaccRequest::new("  ", 1.0, false), Err(WaccError::InvalidInput(_))));
        assert!(matches!(WaccRequest::new("Comércio", -1.0, false), Err(WaccError::InvalidInput(_))));
        assert!(matches!(WaccRequest::new("Comércio", f64::NAN, false), Err(WaccError::InvalidInput(_))));

        let req = WaccRequest::new(" Comércio ", 0.0, true).unwrap();
        assert_eq!(req.activity, "Comércio");
        assert!(req.real_profit);
    }

    #[test]
    fn band_bounds_are_inclusive() {
        let band = SizePremiumBand {
            lower_bound: 10,
            upper_bound: 20,
            premium: 1.5,
        };
        assert!(band.contains(10.0));
        assert!(band.contains(20.0));
        assert!(!band.contains(20.5));
        assert!(!band.contains(9.99));
    }

    #[test]
    fn macro_parameters_set_by_field() {
        let mut macros = MacroParameters::default();
        for (i, field) in MacroField::ALL.into_iter().enumerate() {
            macros.set(field, i as f64);
        }
        assert_eq!(macros.rf, 0.0);
        assert_eq!(macros.ia, 3.0);
        assert_eq!(macros.ir, 6.0);
    }

    #[test]
    fn detail_serializes_with_table_style_keys() {
        let detail = WaccDetail {
            beta: 1.0,
            de: 0.5,
            rf: 4.5,
            rm: 6.0,
            cr: 2.0,
            ia: 3.0,
            ib: 5.0,
            ct: 8.0,
            ir: 0.0,
            premio: 3.0,
            custo_equity: 0.185,
            custo_debt: 0.08,
            partke: 0.6667,
            partkd: 0.3333,
            ev_sales: 1.2,
            betarealav: 1.5,
            ke_real: 0.1505,
            kenom_br: 0.208,
            kd_real: 0.0335,
            ipca_longo: 0.05,
            valor_da_empresa: 12_000_000.0,
        };
        let json = serde_json::to_value(detail).unwrap();
        for key in ["Beta", "Custo_Equity", "EV_Sales", "ValordaEmpresa", "partke", "IPCAlongo"] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }
}

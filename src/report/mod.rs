//! Reporting utilities: terminal report and JSON rendering.

pub mod format;

pub use format::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{WaccDetail, WaccRequest, WaccResult};

    fn result() -> WaccResult {
        WaccResult {
            wacc_nominal: 0.165_339_8,
            wacc_real: 0.111_487_9,
            detail: WaccDetail {
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
            },
        }
    }

    #[test]
    fn report_shows_headline_figures() {
        let request = WaccRequest::new("Comércio", 10_000_000.0, false).unwrap();
        let text = format_result(&request, &result());
        assert!(text.contains("Activity: Comércio"));
        assert!(text.contains("WACC nominal: 16.5340%"));
        assert!(text.contains("WACC real:    11.1488%"));
        assert!(text.contains("other (IR = 0)"));
    }

    #[test]
    fn json_round_trips_through_serde() {
        let json = result_json(&result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["detail"]["Premio"], 3.0);
        assert_eq!(value["detail"]["ValordaEmpresa"], 12_000_000.0);
        let back: WaccResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result());
    }

    #[test]
    fn activities_one_per_line() {
        let list = vec!["Comércio".to_string(), "Serviços".to_string()];
        assert_eq!(format_activities(&list), "Comércio\nServiços");
    }
}

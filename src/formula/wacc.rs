//! The WACC formula chain.
//!
//! Inputs follow the table conventions: macro fields and the size premium are
//! percentages, `ipca_longo` is a decimal fraction.

use crate::domain::{ResolvedParameters, WaccBreakdown, WaccDetail, WaccResult};
use crate::math::round_to;

/// Evaluate the formula chain. Pure; performs no fallback substitution.
pub fn evaluate(params: &ResolvedParameters) -> WaccBreakdown {
    let beta = params.activity.beta;
    let de = params.activity.debt_to_equity;
    let m = &params.macros;

    let beta_realav = beta * (1.0 + de * (1.0 - m.ir / 100.0));
    let ke_nom_us = (m.rf + beta_realav * m.rm + m.cr + params.premium) / 100.0;
    let ke_real = (1.0 + ke_nom_us) / (1.0 + m.ia / 100.0) - 1.0;
    let ke_nom_br = (1.0 + ke_real) * (1.0 + m.ib / 100.0) - 1.0;

    let kd_nom = (m.ct / 100.0) * (1.0 - m.ir / 100.0);
    let kd_real = (1.0 + kd_nom) / (1.0 + params.ipca_longo) - 1.0;

    let (part_kd, part_ke) = capital_weights(de);

    WaccBreakdown {
        beta_realav,
        ke_nom_us,
        ke_real,
        ke_nom_br,
        kd_nom,
        kd_real,
        part_kd,
        part_ke,
        wacc_real: kd_real * part_kd + ke_real * part_ke,
        wacc_nominal: kd_nom * part_kd + ke_nom_br * part_ke,
    }
}

/// Debt and equity weights `(partkd, partke)` for a debt-to-equity ratio.
pub fn capital_weights(de: f64) -> (f64, f64) {
    if de == 0.0 {
        return (0.0, 1.0);
    }
    let part_kd = de / (1.0 + de);
    (part_kd, 1.0 - part_kd)
}

/// Package a breakdown with its rounded diagnostics.
pub fn to_result(params: &ResolvedParameters, b: &WaccBreakdown) -> WaccResult {
    let m = &params.macros;
    WaccResult {
        wacc_nominal: b.wacc_nominal,
        wacc_real: b.wacc_real,
        detail: WaccDetail {
            beta: round_to(params.activity.beta, 4),
            de: round_to(params.activity.debt_to_equity, 4),
            rf: round_to(m.rf, 2),
            rm: round_to(m.rm, 2),
            cr: round_to(m.cr, 2),
            ia: round_to(m.ia, 2),
            ib: round_to(m.ib, 2),
            ct: round_to(m.ct, 2),
            ir: round_to(m.ir, 2),
            premio: round_to(params.premium, 2),
            custo_equity: round_to(b.ke_nom_us, 4),
            custo_debt: round_to(b.kd_nom, 4),
            partke: round_to(b.part_ke, 4),
            partkd: round_to(b.part_kd, 4),
            ev_sales: params.activity.ev_to_sales,
            betarealav: round_to(b.beta_realav, 4),
            ke_real: round_to(b.ke_real, 4),
            kenom_br: round_to(b.ke_nom_br, 4),
            kd_real: round_to(b.kd_real, 4),
            ipca_longo: round_to(params.ipca_longo, 2),
            valor_da_empresa: round_to(params.company_value, 2),
        },
    }
}

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Outcome of evaluating one selected zone. Values keep full precision,
/// rounding happens in `Display` and `popup_html` only. Presenters backed by a
/// web panel can send it as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityResult {
    pub feature_id: String,
    pub zone_code: String,
    pub land_use: String,
    pub area_sq_meters: f64,
    pub coefficient: f64,
    pub built_area_sq_meters: f64,
    pub perimeter_meters: f64,
}

impl FeasibilityResult {
    pub fn area_hectares(&self) -> f64 {
        self.area_sq_meters / 10_000.0
    }

    pub fn popup_html(&self) -> String {
        [
            ("ID", escape_html(&self.feature_id)),
            ("Zona", escape_html(&self.zone_code)),
            ("Uso", escape_html(&self.land_use)),
            ("Área", format!("{:.1} m²", self.area_sq_meters)),
            ("Perímetro", format!("{:.0} m", self.perimeter_meters)),
            ("Coef", format_coefficient(self.coefficient)),
            (
                "Área potencial construída",
                format!("{:.1} m²", self.built_area_sq_meters),
            ),
        ]
        .iter()
        .map(|(label, value)| format!("<b>{label}:</b> {value}"))
        .collect::<Vec<_>>()
        .join("<br>")
    }
}

impl Display for FeasibilityResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {} | Zona: {} | Uso: {} | Área: {:.1} m² | Coef: {} | Área potencial construída: {:.1} m²",
            self.feature_id,
            self.zone_code,
            self.land_use,
            self.area_sq_meters,
            format_coefficient(self.coefficient),
            self.built_area_sq_meters,
        )
    }
}

// Whole coefficients keep one decimal: 3.0, not 3
fn format_coefficient(coefficient: f64) -> String {
    if coefficient.fract() == 0.0 && coefficient.abs() < 1e15 {
        format!("{coefficient:.1}")
    } else {
        format!("{coefficient}")
    }
}

fn escape_html(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => res.push_str("&amp;"),
            '<' => res.push_str("&lt;"),
            '>' => res.push_str("&gt;"),
            '"' => res.push_str("&quot;"),
            '\'' => res.push_str("&#39;"),
            _ => res.push(c),
        }
    }
    res
}

#[cfg(test)]
mod test {
    use super::FeasibilityResult;

    fn mock() -> FeasibilityResult {
        FeasibilityResult {
            feature_id: "Z-001".into(),
            zone_code: "ZE5".into(),
            land_use: "Residencial".into(),
            area_sq_meters: 27_639.46,
            coefficient: 3.0,
            built_area_sq_meters: 82_918.38,
            perimeter_meters: 665.04,
        }
    }

    #[test]
    fn display() {
        assert_eq!(
            "ID: Z-001 | Zona: ZE5 | Uso: Residencial | Área: 27639.5 m² | Coef: 3.0 | Área potencial construída: 82918.4 m²",
            mock().to_string(),
        );
    }

    #[test]
    fn display_fractional_coefficient() {
        let res = FeasibilityResult {
            coefficient: 2.5,
            ..mock()
        };
        assert!(res.to_string().contains("| Coef: 2.5 |"));
    }

    #[test]
    fn area_hectares() {
        assert!((mock().area_hectares() - 2.763946).abs() < 1e-9);
    }

    #[test]
    fn popup_html() {
        let res = FeasibilityResult {
            land_use: "Comércio & <Serviços>".into(),
            ..mock()
        };
        assert_eq!(
            "<b>ID:</b> Z-001<br><b>Zona:</b> ZE5<br><b>Uso:</b> Comércio &amp; &lt;Serviços&gt;<br><b>Área:</b> 27639.5 m²<br><b>Perímetro:</b> 665 m<br><b>Coef:</b> 3.0<br><b>Área potencial construída:</b> 82918.4 m²",
            res.popup_html(),
        );
    }

    #[test]
    fn serialize() -> crate::Result<()> {
        let json = serde_json::to_value(mock())?;
        assert_eq!("Z-001", json["feature_id"]);
        assert_eq!(3.0, json["coefficient"]);
        assert_eq!(82_918.38, json["built_area_sq_meters"]);
        Ok(())
    }
}

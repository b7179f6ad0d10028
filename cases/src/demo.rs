use crate::types::CaseFields;
use crate::types::Medium;
use chrono::DateTime;
use chrono::Local;
use rand::Rng;

/// A plausible test case for trying the app out.
pub fn sample_case<R: Rng + ?Sized>(rng: &mut R, now: &DateTime<Local>) -> CaseFields {
    CaseFields {
        date_time: now.format("%Y-%m-%dT%H:%M").to_string(),
        nurej: format!("2024{}", rng.random_range(0..10_000)),
        case_number: format!("FIS-LPZ-{}/2024", rng.random_range(0..100)),
        city: "La Paz".to_string(),
        characteristics: "Caso de prueba generado automáticamente para verificar funciones."
            .to_string(),
        parties: "Parte A vs. Parte B".to_string(),
        crime: "Delito de Prueba".to_string(),
        hearing_type: "Cautelares".to_string(),
        court_room: "Juzgado 1ro".to_string(),
        lawyer: "Dr. Demo".to_string(),
        medium: if rng.random_bool(0.5) {
            Medium::Virtual
        } else {
            Medium::Presencial
        },
        observations: "Registro generado por sistema.".to_string(),
    }
}

//! Property tests for the recipe parser

use lavandera_core::recipe::{
    parse, to_flat_text, ChemicalId, ParseErrorKind, Speed, StageKind, WaterTemperature,
};
use proptest::prelude::*;

const ACTIONS: &[&str] = &[
    "prelavado",
    "lavado",
    "enjuague",
    "dosificar",
    "agitar",
    "balanceo",
    "drenaje",
    "centrifugado",
    "secado",
];

fn flat_line() -> impl Strategy<Value = String> {
    (
        prop::sample::select(ACTIONS),
        0u32..5000,
        prop::option::of(prop::sample::select(&["fria", "caliente"][..])),
        prop::option::of(prop::sample::select(&["A", "B", "C", "D"][..])),
        prop::option::of(prop::sample::select(&["bajo", "media", "ALTO"][..])),
    )
        .prop_map(|(action, duration, water, chemical, speed)| {
            let mut line = format!("accion={};duracion={}", action, duration);
            if let Some(w) = water {
                line.push_str(&format!(";agua={}", w));
            }
            // Dose stages must name a chemical
            match (chemical, action) {
                (Some(c), _) => line.push_str(&format!(";quimico={}", c)),
                (None, "dosificar") => line.push_str(";quimico=A"),
                (None, _) => {}
            }
            if let Some(s) = speed {
                line.push_str(&format!(";velocidad={}", s));
            }
            line
        })
}

proptest! {
    #[test]
    fn flat_text_round_trips(lines in prop::collection::vec(flat_line(), 1..12)) {
        let text = format!("nombre=prueba\n{}\n", lines.join("\n"));
        let recipe = parse(&text).unwrap();
        let again = parse(&to_flat_text(&recipe)).unwrap();
        prop_assert_eq!(recipe, again);
    }

    #[test]
    fn total_is_sum_of_stages(durations in prop::collection::vec(0u32..100_000, 1..20)) {
        let text: String = durations
            .iter()
            .map(|d| format!("accion=drenaje;duracion={}\n", d))
            .collect();
        let recipe = parse(&text).unwrap();
        let expected: u64 = durations.iter().map(|&d| u64::from(d)).sum();
        prop_assert_eq!(recipe.total_duration_s(), expected);
    }

    #[test]
    fn parser_never_panics(text in "\\PC{0,400}") {
        let _ = parse(&text);
    }

    #[test]
    fn parser_never_panics_on_recipe_like_text(
        lines in prop::collection::vec("[\\[\\]A-Za-z_=;:,0-9 #-]{0,40}", 0..20)
    ) {
        let _ = parse(&lines.join("\n"));
    }

    #[test]
    fn unit_suffix_always_rejected(seconds in 0u32..10_000, unit in "[a-zA-Z]{1,3}") {
        let text = format!("accion=lavado;duracion={}{}", seconds, unit);
        let err = parse(&text).unwrap_err();
        prop_assert_eq!(err.kind, ParseErrorKind::InvalidInteger);
    }

    #[test]
    fn sectioned_total_matches_formula(
        fill in 0u32..1000,
        doses in prop::array::uniform4(0u32..100),
        agitate in 0u32..1000,
        reps in 0u32..50,
        rinse_fill in 0u32..500,
        rinse_agitate in 0u32..500,
        balance in 0u32..200,
        spin in 0u32..600,
    ) {
        let text = format!(
            "[LAVADO]\nLLENADO_S={}\nDOSIFICAR=A:{},B:{},C:{},D:{}\nAGITAR_S={}\nVEL=BAJA\n\
             [ENJUAGUE]\nREPETICIONES={}\nLLENADO_S={}\nAGITAR_S={}\n\
             [CENTRIFUGADO]\nBALANCEO_S={}\nCENTRIFUGADO_S={}\nVEL=ALTA\n",
            fill, doses[0], doses[1], doses[2], doses[3], agitate,
            reps, rinse_fill, rinse_agitate, balance, spin,
        );
        let dose_total: u32 = doses.iter().sum();
        let spin_part = if spin > 0 { 10 + spin } else { 0 };
        let expected = u64::from(fill + dose_total + agitate)
            + u64::from(reps) * u64::from(rinse_fill + rinse_agitate + 20)
            + u64::from(balance + spin_part);

        let recipe = parse(&text).unwrap();
        prop_assert_eq!(recipe.total_duration_s(), expected);
        prop_assert_eq!(recipe.is_empty(), expected == 0);
    }
}

#[test]
fn sectioned_stage_order() {
    let text = "\
NOMBRE=Toallas
[LAVADO]
LLENADO_S=60
DOSIFICAR=B:5
AGITAR_S=120
VEL=MEDIA
[ENJUAGUE]
REPETICIONES=1
LLENADO_S=30
AGITAR_S=40
[CENTRIFUGADO]
CENTRIFUGADO_S=90
";
    let recipe = parse(text).unwrap();
    assert_eq!(recipe.name(), "Toallas");

    let kinds: Vec<StageKind> = recipe.stages().iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        [
            StageKind::Fill,
            StageKind::Dose,
            StageKind::Agitate,
            StageKind::Fill,
            StageKind::Agitate,
            StageKind::Drain,
            StageKind::Drain,
            StageKind::Spin,
        ]
    );

    let stages = recipe.stages();
    assert_eq!(stages[0].water, WaterTemperature::Cold);
    assert_eq!(stages[1].chemical, Some(ChemicalId::B));
    assert_eq!(stages[2].speed, Speed::Medium);
    assert_eq!(stages[5].duration_s, 20);
    assert_eq!(stages[6].duration_s, 10);
    assert_eq!(stages[7].speed, Speed::High);
}

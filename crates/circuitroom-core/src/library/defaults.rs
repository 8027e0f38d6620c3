use super::ExerciseDraft;

/// (name, rom_cm, reps_per_40s, dumbbells, vertical_factor, is_floor)
const DEFAULTS: &[(&str, f64, f64, u8, f64, bool)] = &[
    ("Bizeps Curls", 35.0, 14.0, 2, 0.9, false),
    ("Hammer Curls", 35.0, 14.0, 2, 0.9, false),
    ("Schulterdrücken", 50.0, 12.0, 2, 1.0, false),
    ("Seitheben", 55.0, 12.0, 2, 0.6, false),
    ("Frontheben", 60.0, 12.0, 2, 0.7, false),
    ("Aufrechtes Rudern", 45.0, 13.0, 2, 1.0, false),
    ("Kniebeugen", 50.0, 15.0, 2, 1.0, false),
    ("Ausfallschritte", 45.0, 12.0, 2, 1.0, false),
    ("Kreuzheben", 60.0, 12.0, 2, 1.0, false),
    ("Vorgebeugtes Rudern", 40.0, 14.0, 2, 0.9, false),
    ("Trizeps Überkopf", 45.0, 13.0, 1, 0.9, false),
    ("Goblet Squats", 50.0, 14.0, 1, 1.0, false),
    ("Bankdrücken am Boden", 35.0, 14.0, 2, 1.0, true),
    ("Fliegende am Boden", 45.0, 12.0, 2, 0.7, true),
    ("Russian Twists", 30.0, 20.0, 1, 0.2, true),
    ("Glute Bridges", 25.0, 16.0, 1, 1.0, true),
];

/// Built-in library used to seed an owner with no exercises.
pub fn default_exercises() -> Vec<ExerciseDraft> {
    DEFAULTS
        .iter()
        .map(
            |&(name, rom_cm, reps_per_40s, dumbbells_used, vertical_factor, is_floor)| {
                ExerciseDraft {
                    name: name.to_string(),
                    rom_cm,
                    reps_per_40s,
                    dumbbells_used,
                    vertical_factor,
                    is_floor,
                }
            },
        )
        .collect()
}

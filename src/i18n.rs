//! Translation tables for generated strings.
//!
//! Lookups fall back to English, then to the key itself.

use chrono::Locale;

const LANGUAGES: &[&str] = &["en", "de", "es", "fr", "it"];

/// Normalize a language code (`"de-AT"` → `"de"`), falling back to `"en"`.
pub fn normalize_lang(lang: &str) -> &'static str {
    let main = lang.split(['-', '_']).next().unwrap_or("").to_lowercase();
    LANGUAGES
        .iter()
        .copied()
        .find(|l| *l == main)
        .unwrap_or("en")
}

/// Locale used for month and weekday names.
pub fn chrono_locale(lang: &str) -> Locale {
    match normalize_lang(lang) {
        "de" => Locale::de_DE,
        "es" => Locale::es_ES,
        "fr" => Locale::fr_FR,
        "it" => Locale::it_IT,
        _ => Locale::en_US,
    }
}

/// Translate `key` and substitute `{name}` placeholders from `params`.
pub fn translate(key: &str, lang: &str, params: &[(&str, &str)]) -> String {
    let mut text = lookup(normalize_lang(lang), key)
        .or_else(|| lookup("en", key))
        .unwrap_or(key)
        .to_string();
    for (name, value) in params {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}

fn lookup(lang: &str, key: &str) -> Option<&'static str> {
    let text = match (lang, key) {
        ("en", "Mode") => "Mode",
        ("en", "Today") => "Today",
        ("en", "Hour") => "Hour",
        ("en", "Quarter Day") => "Quarter Day",
        ("en", "Half Day") => "Half Day",
        ("en", "Day") => "Day",
        ("en", "Week") => "Week",
        ("en", "Month") => "Month",
        ("en", "Year") => "Year",
        ("en", "task_no_start_date") => "Task {id} has no start date",
        ("en", "task_no_end_date") => "Task {id} has no end date",
        ("en", "task_start_after_end") => "Task {id} ends before it starts",
        ("en", "task_duration_too_long") => "Task {id} lasts longer than 10 years",
        ("en", "task_invalid_date") => "Task {id} has an unreadable date '{value}'",
        ("en", "task_invalid_duration") => "Task {id} has an invalid duration '{value}'",
        ("en", "task_no_group_key") => "Task {id} has no group key",
        ("en", "task_unknown_group") => "Task {id} refers to unknown group '{key}'",

        ("de", "Mode") => "Modus",
        ("de", "Today") => "Heute",
        ("de", "Hour") => "Stunde",
        ("de", "Quarter Day") => "Vierteltag",
        ("de", "Half Day") => "Halber Tag",
        ("de", "Day") => "Tag",
        ("de", "Week") => "Woche",
        ("de", "Month") => "Monat",
        ("de", "Year") => "Jahr",
        ("de", "task_no_start_date") => "Aufgabe {id} hat kein Startdatum",
        ("de", "task_no_end_date") => "Aufgabe {id} hat kein Enddatum",
        ("de", "task_start_after_end") => "Aufgabe {id} endet vor ihrem Beginn",
        ("de", "task_duration_too_long") => "Aufgabe {id} dauert länger als 10 Jahre",
        ("de", "task_invalid_date") => "Aufgabe {id} hat ein ungültiges Datum '{value}'",
        ("de", "task_invalid_duration") => "Aufgabe {id} hat eine ungültige Dauer '{value}'",
        ("de", "task_no_group_key") => "Aufgabe {id} hat keinen Gruppenschlüssel",
        ("de", "task_unknown_group") => "Aufgabe {id} verweist auf die unbekannte Gruppe '{key}'",

        ("es", "Mode") => "Modo",
        ("es", "Today") => "Hoy",
        ("es", "Hour") => "Hora",
        ("es", "Quarter Day") => "Cuarto de día",
        ("es", "Half Day") => "Medio día",
        ("es", "Day") => "Día",
        ("es", "Week") => "Semana",
        ("es", "Month") => "Mes",
        ("es", "Year") => "Año",
        ("es", "task_no_start_date") => "La tarea {id} no tiene fecha de inicio",
        ("es", "task_no_end_date") => "La tarea {id} no tiene fecha de fin",
        ("es", "task_start_after_end") => "La tarea {id} termina antes de empezar",
        ("es", "task_duration_too_long") => "La tarea {id} dura más de 10 años",
        ("es", "task_invalid_date") => "La tarea {id} tiene una fecha no válida '{value}'",
        ("es", "task_invalid_duration") => "La tarea {id} tiene una duración no válida '{value}'",
        ("es", "task_no_group_key") => "La tarea {id} no tiene clave de grupo",
        ("es", "task_unknown_group") => "La tarea {id} hace referencia al grupo desconocido '{key}'",

        ("fr", "Mode") => "Mode",
        ("fr", "Today") => "Aujourd'hui",
        ("fr", "Hour") => "Heure",
        ("fr", "Quarter Day") => "Quart de journée",
        ("fr", "Half Day") => "Demi-journée",
        ("fr", "Day") => "Jour",
        ("fr", "Week") => "Semaine",
        ("fr", "Month") => "Mois",
        ("fr", "Year") => "Année",
        ("fr", "task_no_start_date") => "La tâche {id} n'a pas de date de début",
        ("fr", "task_no_end_date") => "La tâche {id} n'a pas de date de fin",
        ("fr", "task_start_after_end") => "La tâche {id} se termine avant de commencer",
        ("fr", "task_duration_too_long") => "La tâche {id} dure plus de 10 ans",
        ("fr", "task_invalid_date") => "La tâche {id} a une date illisible '{value}'",
        ("fr", "task_invalid_duration") => "La tâche {id} a une durée invalide '{value}'",
        ("fr", "task_no_group_key") => "La tâche {id} n'a pas de clé de groupe",
        ("fr", "task_unknown_group") => "La tâche {id} fait référence au groupe inconnu '{key}'",

        ("it", "Mode") => "Modalità",
        ("it", "Today") => "Oggi",
        ("it", "Hour") => "Ora",
        ("it", "Quarter Day") => "Quarto di giorno",
        ("it", "Half Day") => "Mezza giornata",
        ("it", "Day") => "Giorno",
        ("it", "Week") => "Settimana",
        ("it", "Month") => "Mese",
        ("it", "Year") => "Anno",
        ("it", "task_no_start_date") => "L'attività {id} non ha una data di inizio",
        ("it", "task_no_end_date") => "L'attività {id} non ha una data di fine",
        ("it", "task_start_after_end") => "L'attività {id} termina prima di iniziare",
        ("it", "task_duration_too_long") => "L'attività {id} dura più di 10 anni",
        ("it", "task_invalid_date") => "L'attività {id} ha una data non valida '{value}'",
        ("it", "task_invalid_duration") => "L'attività {id} ha una durata non valida '{value}'",
        ("it", "task_no_group_key") => "L'attività {id} non ha una chiave di gruppo",
        ("it", "task_unknown_group") => "L'attività {id} fa riferimento al gruppo sconosciuto '{key}'",

        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn region_codes_fall_back_to_main_language() {
        assert_eq!(normalize_lang("de-AT"), "de");
        assert_eq!(normalize_lang("pt-BR"), "en");
        assert_eq!(normalize_lang(""), "en");
    }

    #[test]
    fn substitutes_parameters() {
        let text = translate("task_no_start_date", "fr", &[("id", "A")]);
        assert_eq!(text, "La tâche A n'a pas de date de début");
    }

    #[test]
    fn unknown_keys_are_returned_verbatim() {
        assert_eq!(translate("Sprint", "it", &[]), "Sprint");
    }

    #[test]
    fn every_validation_error_has_a_translation() {
        let errors = [
            ValidationError::MissingStart { id: "a".into() },
            ValidationError::InvalidDate { id: "a".into(), value: "soon".into() },
            ValidationError::MissingEnd { id: "a".into() },
            ValidationError::InvalidDuration { id: "a".into(), value: "3q".into() },
            ValidationError::EndNotAfterStart { id: "a".into() },
            ValidationError::DurationTooLong { id: "a".into() },
            ValidationError::MissingGroupKey { id: "a".into() },
            ValidationError::UnknownGroup { id: "a".into(), key: "ops".into() },
        ];
        for lang in LANGUAGES {
            for err in &errors {
                assert!(lookup(lang, err.i18n_key()).is_some(), "{lang}: {err}");
                let text = translate(err.i18n_key(), lang, &err.i18n_params());
                assert!(!text.contains('{'), "{lang}: {text}");
            }
        }
    }

    #[test]
    fn unknown_group_message_names_the_key() {
        let err = ValidationError::UnknownGroup { id: "a".into(), key: "ops".into() };
        assert_eq!(
            translate(err.i18n_key(), "de", &err.i18n_params()),
            "Aufgabe a verweist auf die unbekannte Gruppe 'ops'"
        );
    }
}

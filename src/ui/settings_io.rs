use crate::engine::storage::{self, KvStore};
use crate::ui::settings::AppSettings;

pub const SETTINGS_KEY: &str = "settings.v1";
const SETTINGS_VERSION: u32 = 1;

pub fn load_settings(store: &dyn KvStore) -> AppSettings {
    storage::load::<AppSettings>(store, SETTINGS_KEY, SETTINGS_VERSION)
        .unwrap_or_default()
        .sanitized()
}

pub fn save_settings(store: &dyn KvStore, settings: &AppSettings) {
    storage::persist(store, SETTINGS_KEY, SETTINGS_VERSION, settings);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::storage::MemoryStore;
    use crate::engine::voice::Language;

    #[test]
    fn settings_round_trip() {
        let store = MemoryStore::default();
        let mut s = AppSettings::default();
        s.voice_language = Language::Swedish;
        s.debounce_ms = 100;
        save_settings(&store, &s);
        assert_eq!(load_settings(&store), s);
    }

    #[test]
    fn missing_or_stale_settings_use_defaults() {
        let store = MemoryStore::default();
        assert_eq!(load_settings(&store), AppSettings::default());
        store
            .set(SETTINGS_KEY, r#"{"version":0,"data":{"ui_scale":1.5}}"#)
            .unwrap();
        assert_eq!(load_settings(&store), AppSettings::default());
    }
}

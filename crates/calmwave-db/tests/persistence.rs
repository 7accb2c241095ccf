//! Records survive closing and reopening the database file.

use calmwave_core::{MeditationRepository, NewMeditation, Script, Segment, SpeechSegment};
use calmwave_db::{RepositoryFactory, setup_database};

fn new_meditation() -> NewMeditation {
    NewMeditation {
        user_id: "user-42".to_string(),
        user_input: "can't sleep".to_string(),
        script: Script {
            title: "Night Rest".to_string(),
            target_word_count: 100,
            actual_word_count: 3,
            duration_minutes: 1,
            segments: vec![Segment::Speech(SpeechSegment {
                content: "Let the day go.".to_string(),
                word_count: 4,
                duration: 3.0,
            })],
        },
        audio_file_path: "/audio/meditation-night.mp3".to_string(),
    }
}

#[tokio::test]
async fn meditation_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calmwave.db");

    let stored = {
        let pool = setup_database(&path).await.unwrap();
        let repo = RepositoryFactory::meditation_repository(pool.clone());
        let stored = repo.insert(&new_meditation()).await.unwrap();
        pool.close().await;
        stored
    };

    let pool = setup_database(&path).await.unwrap();
    let repo = RepositoryFactory::meditation_repository(pool);
    let loaded = repo.get(stored.id).await.unwrap();
    assert_eq!(loaded, stored);

    let page = repo.list_by_user("user-42", 1, 10).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.meditations[0].id, stored.id);
}

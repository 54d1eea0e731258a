use galaga_tui::scores::{HighScores, ScoreEntry, SortOrder, MAX_SCORES};

#[test]
fn table_survives_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("galaga.scores");

    let mut hs = HighScores::load(&path);
    assert!(hs.add_new_score("ACE", 300, 3));
    assert!(hs.add_new_score("BEE", 120, 2));

    let reloaded = HighScores::load(&path);
    assert_eq!(
        reloaded.entries(),
        &[ScoreEntry::new("ACE", 300, 3), ScoreEntry::new("BEE", 120, 2)]
    );
}

#[test]
fn only_the_top_ten_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("galaga.scores");

    let mut hs = HighScores::load(&path);
    for score in 1..=MAX_SCORES as u32 {
        assert!(hs.add_new_score("PIL", score * 10, 1));
    }
    assert!(!hs.qualifies(5));
    assert!(hs.qualifies(10));
    assert!(!hs.add_new_score("LOW", 5, 1));
    assert!(hs.add_new_score("TOP", 999, 3));

    let reloaded = HighScores::load(&path);
    assert_eq!(reloaded.entries().len(), MAX_SCORES);
    assert_eq!(reloaded.entries()[0].name, "TOP");
    assert!(reloaded.entries().iter().all(|e| e.score > 10));
}

#[test]
fn every_view_lists_the_same_entries() {
    let dir = tempfile::tempdir().unwrap();
    let mut hs = HighScores::load(dir.path().join("galaga.scores"));
    hs.add_new_score("CAT", 30, 1);
    hs.add_new_score("ANT", 30, 3);
    hs.add_new_score("BEE", 50, 2);

    for &order in SortOrder::all() {
        let mut names: Vec<String> = hs.sorted_by(order).into_iter().map(|e| e.name).collect();
        names.sort();
        assert_eq!(names, ["ANT", "BEE", "CAT"], "{}", order.label());
    }
}

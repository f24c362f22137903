use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;
use crate::{
    document::{
        Document, Ownership, Page, PageId, PermissionLevel, SessionViewer,
        memory::MemoryDocumentStore,
    },
    feedback::mock::{RecordingCue, RecordingNotifier},
    intents::{ReaderIntent, ScriptedIntents},
    navigation::{Direction, NavPhase},
    settings::FALLBACK_AD,
};

type TestReader =
    NewsReader<MemoryDocumentStore, ScriptedIntents, SessionViewer, RecordingCue, ChaCha8Rng>;

const NEWS: &str = "JournalEntry.news";
const ADS: &str = "JournalEntry.ads";
const DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

fn id(raw: &str) -> PageId {
    PageId::new(raw)
}

fn shared_page(raw_id: &str, name: &str, sort: i64) -> Page {
    Page::new(raw_id, name, sort)
        .with_content(format!("<p>{name} edition</p>"))
        .with_ownership(Ownership::with_default(PermissionLevel::Observer))
}

fn news_pages() -> Document {
    DAYS.iter()
        .enumerate()
        .fold(Document::new(NEWS, "Advertiser"), |document, (index, day)| {
            document.with_page(shared_page(&format!("p{index}"), day, index as i64 * 100))
        })
}

fn news_with_metadata() -> Document {
    news_pages().with_page(
        Page::new("meta", "metadata", 10_000)
            .with_ownership(Ownership::with_default(PermissionLevel::Owner)),
    )
}

fn ads_document() -> Document {
    Document::new(ADS, "Classifieds")
        .with_page(Page::new("ad1", "Tonic", 0).with_content("<p>Dr. Pym's <b>tonic</b></p>"))
        .with_page(Page::new("ad2", "Lodge", 1).with_content("<p>Join the lodge</p>"))
}

fn open_reader(store: MemoryDocumentStore, viewer: SessionViewer, params: LaunchParams) -> TestReader {
    let parts = ReaderParts {
        store,
        input: ScriptedIntents::new(),
        viewer,
        cue: RecordingCue::default(),
        rng: ChaCha8Rng::seed_from_u64(3),
    };
    let mut notifier = RecordingNotifier::default();
    match NewsReader::open(parts, ReaderConfig::default(), params, &mut notifier) {
        Ok(reader) => reader,
        Err(err) => panic!("reader failed to open: {err}"),
    }
}

fn player_reader() -> TestReader {
    open_reader(
        MemoryDocumentStore::new().with_document(news_with_metadata()),
        SessionViewer::player("User.alice").with_character("Actor.harvey"),
        LaunchParams::new(NEWS),
    )
}

/// Select `target` and let the turn settle.
fn settle_on(reader: &mut TestReader, target: &str, now_ms: u64) -> u64 {
    reader.apply_intent(ReaderIntent::ChangePage(id(target)), now_ms);
    let settled = now_ms + 2_000;
    let _ = reader.tick(settled);
    settled
}

#[test]
fn missing_uuid_warns_and_does_not_open() {
    let parts = ReaderParts {
        store: MemoryDocumentStore::new(),
        input: ScriptedIntents::new(),
        viewer: SessionViewer::player("User.alice"),
        cue: RecordingCue::default(),
        rng: ChaCha8Rng::seed_from_u64(1),
    };
    let mut notifier = RecordingNotifier::default();
    let result = TestReader::open(
        parts,
        ReaderConfig::default(),
        LaunchParams::default().with_title("Gazette"),
        &mut notifier,
    );

    assert!(matches!(result, Err(LaunchError::MissingDocumentId)));
    assert_eq!(notifier.warnings.len(), 1);
}

#[test]
fn first_render_selects_first_page() {
    let mut reader = player_reader();
    assert_eq!(reader.tick(0), TickResult::RenderRequested);
    assert_eq!(reader.tick(0), TickResult::NoRender);

    let context = reader.prepare_context();
    let names: Vec<&str> = context.pages.iter().map(|page| page.name.as_str()).collect();
    assert_eq!(names, DAYS);
    assert_eq!(context.selected_page_id, Some(id("p0")));
    assert_eq!(
        context.content_page.as_ref().map(|page| page.name.as_str()),
        Some("Monday")
    );
    assert_eq!(context.animation_class, None);
    assert_eq!(context.ad_content, None);
    assert!(!context.controls.input_locked);
    assert_eq!(reader.title(), crate::settings::DEFAULT_TITLE);
}

#[test]
fn empty_document_renders_nothing_for_every_filter() {
    let mut reader = open_reader(
        MemoryDocumentStore::new().with_document(Document::new(NEWS, "Empty")),
        SessionViewer::gamemaster("User.gm"),
        LaunchParams::new(NEWS),
    );

    for filter in [Filter::All, Filter::Favorites, Filter::Hidden] {
        reader.apply_intent(ReaderIntent::ChangeFilter(filter), 0);
        let context = reader.prepare_context();
        assert!(context.pages.is_empty());
        assert_eq!(context.selected_page_id, None);
        assert_eq!(context.content_page, None);
        assert_eq!(reader.selection().viewed, None);
    }
}

#[test]
fn unknown_document_degrades_to_empty_context() {
    let mut reader = open_reader(
        MemoryDocumentStore::new(),
        SessionViewer::player("User.alice"),
        LaunchParams::new("JournalEntry.gone"),
    );
    let context = reader.prepare_context();
    assert!(context.pages.is_empty());
    assert_eq!(context.content_page, None);
}

#[test]
fn page_turn_lags_content_behind_selection() {
    let mut reader = player_reader();
    let _ = reader.prepare_context();
    let _ = reader.tick(0);

    reader.input_mut().push(ReaderIntent::ChangePage(id("p3")));
    assert_eq!(reader.tick(100), TickResult::RenderRequested);
    assert_eq!(reader.cue().played.len(), 1);
    assert_eq!(reader.cue().played[0].volume, 0.5);
    assert!(!reader.cue().played[0].looped);

    let context = reader.prepare_context();
    assert_eq!(context.selected_page_id, Some(id("p3")));
    assert_eq!(context.content_page.map(|page| page.id), Some(id("p0")));
    assert_eq!(context.animation_class, Some("page-turn-out"));
    assert!(context.controls.input_locked);

    assert_eq!(reader.tick(549), TickResult::NoRender);
    assert_eq!(reader.tick(550), TickResult::RenderRequested);
    let context = reader.prepare_context();
    assert_eq!(context.content_page.map(|page| page.id), Some(id("p3")));
    assert_eq!(context.animation_class, Some("page-turn-in"));

    assert_eq!(reader.next_deadline_ms(), Some(1_150));
    assert_eq!(reader.tick(1_150), TickResult::RenderRequested);
    let context = reader.prepare_context();
    assert_eq!(context.animation_class, None);
    assert!(!context.controls.input_locked);
    assert_eq!(reader.cue().played.len(), 1);
}

#[test]
fn turning_to_an_earlier_page_goes_back() {
    let mut reader = player_reader();
    let _ = reader.prepare_context();
    let now_ms = settle_on(&mut reader, "p2", 0);

    reader.apply_intent(ReaderIntent::ChangePage(id("p0")), now_ms);
    assert_eq!(
        reader.nav_snapshot().phase,
        NavPhase::TurningOut(Direction::Back)
    );
    assert_eq!(reader.prepare_context().animation_class, Some("page-back-out"));
}

#[test]
fn second_page_change_mid_turn_is_dropped() {
    let mut reader = player_reader();
    let _ = reader.prepare_context();
    let _ = reader.tick(0);

    reader.apply_intent(ReaderIntent::ChangePage(id("p1")), 100);
    assert_eq!(reader.tick(100), TickResult::RenderRequested);
    let before = reader.nav_snapshot();

    reader.apply_intent(ReaderIntent::ChangePage(id("p4")), 120);
    assert_eq!(reader.tick(120), TickResult::NoRender);
    assert_eq!(reader.nav_snapshot(), before);
    assert_eq!(reader.cue().played.len(), 1);
}

#[test]
fn changing_to_the_selected_page_is_ignored() {
    let mut reader = player_reader();
    let _ = reader.prepare_context();
    let _ = reader.tick(0);

    reader.apply_intent(ReaderIntent::ChangePage(id("p0")), 10);
    assert_eq!(reader.tick(10), TickResult::NoRender);
    assert!(!reader.is_animating());
    assert!(reader.cue().played.is_empty());
}

#[test]
fn hiding_the_selected_page_moves_the_selection() {
    let mut reader = player_reader();
    let _ = reader.prepare_context();

    reader.apply_intent(ReaderIntent::ToggleHidden, 0);
    assert_eq!(reader.tick(0), TickResult::RenderRequested);
    let context = reader.prepare_context();
    assert!(context.pages.iter().all(|page| page.id != id("p0")));
    assert_eq!(context.selected_page_id, Some(id("p1")));
    assert!(!context.is_hidden);

    reader.apply_intent(ReaderIntent::ChangeFilter(Filter::Hidden), 0);
    let context = reader.prepare_context();
    assert_eq!(context.pages.len(), 1);
    assert_eq!(context.selected_page_id, Some(id("p0")));
    assert!(context.is_hidden);
    assert!(!context.is_favorite);

    // Favoriting pulls the page off the hidelist, emptying this filter.
    reader.apply_intent(ReaderIntent::ToggleFavorite, 0);
    let context = reader.prepare_context();
    assert!(context.pages.is_empty());
    assert_eq!(context.selected_page_id, None);
    assert_eq!(context.content_page, None);
}

#[test]
fn filter_switch_keeps_a_still_listed_selection() {
    let mut reader = player_reader();
    let _ = reader.prepare_context();
    let now_ms = settle_on(&mut reader, "p2", 0);

    reader.apply_intent(ReaderIntent::ToggleFavorite, now_ms);
    reader.apply_intent(ReaderIntent::ChangeFilter(Filter::Favorites), now_ms);
    let context = reader.prepare_context();
    assert_eq!(context.filter, Filter::Favorites);
    assert_eq!(context.controls.filter_value, Filter::Favorites);
    assert_eq!(context.selected_page_id, Some(id("p2")));
    assert!(context.is_favorite);
    assert_eq!(context.pages.len(), 1);
    assert!(context.pages[0].is_favorite);
}

#[test]
fn preferences_are_stored_under_the_actor_key() {
    let mut reader = player_reader();
    let _ = reader.prepare_context();
    reader.apply_intent(ReaderIntent::ToggleFavorite, 0);

    let stored = reader
        .store()
        .document(&DocumentId::new(NEWS))
        .and_then(Document::metadata_page)
        .and_then(|page| page.flag("md-madness", "Actor.harvey"))
        .cloned();
    assert_eq!(
        stored,
        Some(serde_json::json!({
            "actoruuid": "Actor.harvey",
            "favorites": ["p0"],
            "hidelist": [],
        }))
    );
}

#[test]
fn player_without_metadata_page_reads_empty_and_writes_nothing() {
    let mut reader = open_reader(
        MemoryDocumentStore::new().with_document(news_pages()),
        SessionViewer::player("User.alice"),
        LaunchParams::new(NEWS),
    );

    let context = reader.prepare_context();
    assert_eq!(context.pages.len(), DAYS.len());
    reader.apply_intent(ReaderIntent::ToggleFavorite, 0);
    let context = reader.prepare_context();
    assert!(!context.is_favorite);
    assert_eq!(reader.store().write_attempts(), 0);
}

#[test]
fn gamemaster_opening_creates_the_metadata_page() {
    let mut reader = open_reader(
        MemoryDocumentStore::new().with_document(news_pages()),
        SessionViewer::gamemaster("User.gm"),
        LaunchParams::new(NEWS),
    );

    let context = reader.prepare_context();
    assert_eq!(context.pages.len(), DAYS.len());
    let metadata = reader
        .store()
        .document(&DocumentId::new(NEWS))
        .and_then(Document::metadata_page)
        .cloned();
    assert_eq!(
        metadata.map(|page| page.ownership.default),
        Some(PermissionLevel::Owner)
    );
}

#[test]
fn failed_metadata_creation_degrades_the_session() {
    let mut reader = open_reader(
        MemoryDocumentStore::new()
            .with_document(news_pages())
            .with_rejected_writes(true),
        SessionViewer::gamemaster("User.gm"),
        LaunchParams::new(NEWS),
    );

    let context = reader.prepare_context();
    assert_eq!(context.pages.len(), DAYS.len());
    assert_eq!(reader.store().write_attempts(), 1);

    reader.apply_intent(ReaderIntent::ToggleFavorite, 0);
    let context = reader.prepare_context();
    assert!(!context.is_favorite);
    assert_eq!(reader.store().write_attempts(), 1);
}

#[test]
fn ad_is_picked_once_per_reader() {
    let mut reader = open_reader(
        MemoryDocumentStore::new()
            .with_document(news_with_metadata())
            .with_document(ads_document()),
        SessionViewer::player("User.alice"),
        LaunchParams::new(NEWS).with_ads(ADS),
    );

    let first = reader.prepare_context().ad_content;
    let second = reader.prepare_context().ad_content;
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_ne!(first.as_deref(), Some(FALLBACK_AD));
    assert_eq!(reader.store().resolutions(&DocumentId::new(ADS)), 1);
}

#[test]
fn missing_ad_source_shows_fallback_text() {
    let mut reader = open_reader(
        MemoryDocumentStore::new().with_document(news_with_metadata()),
        SessionViewer::player("User.alice"),
        LaunchParams::new(NEWS).with_ads(ADS),
    );
    assert_eq!(reader.prepare_context().ad_content.as_deref(), Some(FALLBACK_AD));
}

#[test]
fn closing_mid_turn_freezes_the_reader() {
    let mut reader = player_reader();
    let _ = reader.prepare_context();
    reader.apply_intent(ReaderIntent::ChangePage(id("p3")), 0);
    let frozen = reader.nav_snapshot();

    reader.close();
    assert!(reader.is_closed());
    assert_eq!(reader.next_deadline_ms(), None);
    assert_eq!(reader.tick(5_000), TickResult::NoRender);
    reader.apply_intent(ReaderIntent::ChangePage(id("p1")), 5_000);
    assert_eq!(reader.nav_snapshot(), frozen);
    assert_eq!(frozen.viewed, Some(id("p0")));
}

#[test]
fn toggles_without_a_selection_do_nothing() {
    let mut reader = open_reader(
        MemoryDocumentStore::new().with_document(
            Document::new(NEWS, "Empty").with_page(
                Page::new("meta", "metadata", 0)
                    .with_ownership(Ownership::with_default(PermissionLevel::Owner)),
            ),
        ),
        SessionViewer::player("User.alice"),
        LaunchParams::new(NEWS),
    );
    let _ = reader.prepare_context();
    let _ = reader.tick(0);

    reader.apply_intent(ReaderIntent::ToggleFavorite, 0);
    reader.apply_intent(ReaderIntent::ToggleHidden, 0);
    assert_eq!(reader.tick(0), TickResult::NoRender);
    assert_eq!(reader.store().write_attempts(), 0);
}

#[test]
fn queued_intents_drain_in_one_tick() {
    let mut reader = player_reader();
    let _ = reader.prepare_context();
    let _ = reader.tick(0);

    *reader.input_mut() = [
        ReaderIntent::ToggleFavorite,
        ReaderIntent::ChangeFilter(Filter::Favorites),
    ]
    .into_iter()
    .collect();
    assert_eq!(reader.tick(10), TickResult::RenderRequested);

    let context = reader.prepare_context();
    assert_eq!(context.filter, Filter::Favorites);
    assert_eq!(context.selected_page_id, Some(id("p0")));
    assert!(context.is_favorite);
    assert_eq!(reader.tick(20), TickResult::NoRender);
}

#[test]
fn pages_outside_the_catalog_cannot_be_turned_to() {
    let document = news_with_metadata().with_page(
        Page::new("secret", "Keeper notes", 50).with_content("<p>KEEPER ONLY</p>"),
    );
    let mut reader = open_reader(
        MemoryDocumentStore::new().with_document(document),
        SessionViewer::player("User.alice"),
        LaunchParams::new(NEWS),
    );
    let _ = reader.prepare_context();
    let _ = reader.tick(0);
    let before = reader.nav_snapshot();

    for target in ["secret", "meta", "nowhere"] {
        reader.apply_intent(ReaderIntent::ChangePage(id(target)), 10);
        assert_eq!(reader.tick(500), TickResult::NoRender);
        assert_eq!(reader.nav_snapshot(), before);
    }
    assert!(reader.cue().played.is_empty());

    let context = reader.prepare_context();
    assert_eq!(context.selected_page_id, Some(id("p0")));
    assert_eq!(context.content_page.map(|page| page.id), Some(id("p0")));
}

#[test]
fn hidden_pages_cannot_be_turned_to_from_the_full_listing() {
    let mut reader = player_reader();
    let _ = reader.prepare_context();
    let now_ms = settle_on(&mut reader, "p2", 0);
    reader.apply_intent(ReaderIntent::ToggleHidden, now_ms);
    let _ = reader.prepare_context();
    let _ = reader.tick(now_ms);

    reader.apply_intent(ReaderIntent::ChangePage(id("p2")), now_ms);
    assert!(!reader.is_animating());

    reader.apply_intent(ReaderIntent::ChangeFilter(Filter::Hidden), now_ms);
    let _ = reader.prepare_context();
    assert_eq!(reader.selection().selected, Some(id("p2")));
    reader.apply_intent(ReaderIntent::ChangeFilter(Filter::All), now_ms);
    let _ = reader.prepare_context();
    assert_eq!(reader.selection().selected, Some(id("p0")));

    reader.apply_intent(ReaderIntent::ChangePage(id("p2")), now_ms);
    assert!(!reader.is_animating());
}

use std::cell::Cell;
use std::rc::Rc;

use folio_motion_core::{
    Bounds, Config, MotionEvent, PlayState, ProgressConfig, Property, Stage, TimelineId, Value,
    Viewport,
};
use folio_sections::{
    AboutSection, ContactForm, ContactSection, Footer, FormError, HeroSection, LoadingPhase,
    LoadingScreen, Navigation, Page, ProjectsSection, Section, SectionError, SubmitState,
};

const VIEW_H: f32 = 800.0;

fn page_stage() -> Stage {
    let fixture = folio_test_fixtures::stages::load("page").expect("page stage fixture");
    let mut stage = Stage::new();
    for el in &fixture.elements {
        match &el.parent {
            Some(parent) => stage.add_child(parent, &el.id),
            None => stage.add(&el.id),
        };
        if let Some([top, height]) = el.bounds {
            stage.set_bounds(&el.id, Bounds::new(top, height));
        }
    }
    stage
}

/// Fixed 20% per tick: five ticks to reach 100.
fn fast_config() -> Config {
    Config {
        progress: ProgressConfig {
            min_increment: 20.0,
            max_increment: 20.0,
            seed: Some(7),
            ..ProgressConfig::default()
        },
        ..Config::default()
    }
}

fn state_of(section: &dyn Section, id: TimelineId) -> Option<PlayState> {
    section
        .scope()
        .and_then(|s| s.timeline(id))
        .map(|tl| tl.state())
}

fn run(section: &mut dyn Section, total_ms: u64, stage: &Stage) {
    for _ in 0..total_ms / 50 {
        section.update(50, stage);
    }
}

#[test]
fn hero_mount_hides_then_reveals() {
    let _ = env_logger::builder().is_test(true).try_init();
    let stage = page_stage();
    let mut hero = HeroSection::new();
    hero.mount(&stage, &Config::default()).unwrap();

    let out = hero.take_outputs();
    assert_eq!(
        out.last_value("hero/headline", &Property::Opacity),
        Some(Value::num(0.0))
    );
    assert_eq!(
        out.last_value("hero/spline", &Property::X),
        Some(Value::px(100.0))
    );
    assert_eq!(hero.orbs().len(), 3);

    let entrance = hero.entrance().unwrap();
    run(&mut hero, 2_600, &stage);
    assert_eq!(state_of(&hero, entrance), Some(PlayState::Finished));
    let out = hero.take_outputs();
    assert_eq!(
        out.last_value("hero/cta", &Property::Opacity),
        Some(Value::num(1.0))
    );
    assert!(out
        .events
        .contains(&MotionEvent::TimelineCompleted { timeline: entrance }));

    // Orbs loop forever.
    for orb in hero.orbs().to_vec() {
        assert_eq!(state_of(&hero, orb), Some(PlayState::Forward));
    }
}

#[test]
fn hero_unmount_releases_everything_once() {
    let stage = page_stage();
    let mut hero = HeroSection::new();
    hero.mount(&stage, &Config::default()).unwrap();
    let report = hero.unmount();
    assert_eq!(report.timelines, 4);
    assert!(!hero.is_mounted());
    assert_eq!(hero.unmount().total(), 0);

    // Updating an unmounted section is a no-op.
    hero.update(100, &stage);
    assert!(hero.take_outputs().is_empty());
}

#[test]
fn remount_replaces_previous_scope() {
    let stage = page_stage();
    let mut about = AboutSection::new();
    about.mount(&stage, &Config::default()).unwrap();
    about.scroll(Viewport::new(200.0, VIEW_H), &stage);
    about.mount(&stage, &Config::default()).unwrap();
    assert_eq!(about.reveals().len(), 4);

    // The fresh scope has no viewport yet, so nothing is playing.
    let fade = about.reveals()[0];
    assert_eq!(state_of(&about, fade), Some(PlayState::Idle));
    assert!(about.scope().unwrap().viewport().is_none());
}

#[test]
fn about_reveals_follow_scroll() {
    let stage = page_stage();
    let mut about = AboutSection::new();
    about.mount(&stage, &Config::default()).unwrap();
    let fade = about.reveals()[0];

    about.scroll(Viewport::new(0.0, VIEW_H), &stage);
    assert_eq!(state_of(&about, fade), Some(PlayState::Idle));

    // Section top at 800 passes 80% of the viewport (640) once scrolled 200.
    about.scroll(Viewport::new(200.0, VIEW_H), &stage);
    assert_eq!(state_of(&about, fade), Some(PlayState::Forward));
    about.update(400, &stage);

    about.scroll(Viewport::new(0.0, VIEW_H), &stage);
    assert_eq!(state_of(&about, fade), Some(PlayState::Reverse));
    about.update(1_000, &stage);
    let out = about.take_outputs();
    assert_eq!(
        out.last_value("about", &Property::Opacity),
        Some(Value::num(0.0))
    );
}

#[test]
fn project_cards_stagger_by_index() {
    let stage = page_stage();
    let mut projects = ProjectsSection::new();
    projects.mount(&stage, &Config::default()).unwrap();
    let cards = projects.cards().unwrap();
    let tl = projects.scope().unwrap().timeline(cards).unwrap();
    let starts = &tl.steps()[0].child_starts;
    assert_eq!(starts.len(), 4);
    for (n, (target, start)) in starts.iter().enumerate() {
        assert_eq!(target, &format!("projects/card-{n}"));
        assert!((start - n as f32 * 0.15).abs() < 1e-5);
    }
}

#[test]
fn contact_rejects_invalid_form_without_scheduling() {
    let stage = page_stage();
    let mut contact = ContactSection::new();
    contact.mount(&stage, &Config::default()).unwrap();
    *contact.form_mut() = ContactForm::new("Ada", "not-an-email", "hello");
    assert_eq!(
        contact.submit(),
        Err(FormError::InvalidEmail("not-an-email".into()))
    );
    assert_eq!(contact.state(), SubmitState::Idle);
}

#[test]
fn contact_submission_delivers_and_resets() {
    let stage = page_stage();
    let mut contact = ContactSection::new();
    contact.mount(&stage, &Config::default()).unwrap();
    let sent = ContactForm::new("Ada", "ada@example.com", "hello");
    *contact.form_mut() = sent.clone();

    let timer = contact.submit().unwrap();
    assert_eq!(contact.state(), SubmitState::Submitting { timer });
    assert_eq!(contact.submit(), Err(FormError::AlreadySubmitting));

    contact.update(1_999, &stage);
    assert!(contact.delivered().is_empty());
    contact.update(1, &stage);
    assert_eq!(contact.delivered(), &[sent]);
    assert!(contact.form().is_empty());
    assert_eq!(contact.state(), SubmitState::Idle);

    let pulse = contact.pulse().unwrap();
    run(&mut contact, 600, &stage);
    assert_eq!(state_of(&contact, pulse), Some(PlayState::Finished));
    assert_eq!(
        contact.take_outputs().last_value("contact/form", &Property::Scale),
        Some(Value::num(1.0))
    );
}

#[test]
fn contact_unmount_cancels_pending_submission() {
    let stage = page_stage();
    let mut contact = ContactSection::new();
    contact.mount(&stage, &Config::default()).unwrap();
    *contact.form_mut() = ContactForm::new("Ada", "ada@example.com", "hello");
    contact.submit().unwrap();

    let report = contact.unmount();
    assert_eq!(report.timers, 1);
    contact.update(5_000, &stage);
    assert!(contact.delivered().is_empty());
    assert_eq!(contact.submit(), Err(FormError::NotMounted));
}

#[test]
fn focus_then_blur_returns_to_rest() {
    let stage = page_stage();
    let mut contact = ContactSection::new();
    contact.mount(&stage, &Config::default()).unwrap();
    contact.take_outputs();

    contact.focus("contact/name", &stage).unwrap();
    contact.update(300, &stage);
    assert_eq!(
        contact.take_outputs().last_value("contact/name", &Property::Scale),
        Some(Value::num(1.02))
    );

    contact.blur("contact/name", &stage).unwrap();
    contact.update(300, &stage);
    assert_eq!(
        contact.take_outputs().last_value("contact/name", &Property::Scale),
        Some(Value::num(1.0))
    );
}

#[test]
fn navigation_tracks_scroll_until_unmounted() {
    let stage = page_stage();
    let mut nav = Navigation::new();
    nav.mount(&stage, &Config::default()).unwrap();

    nav.scroll(Viewport::new(50.0, VIEW_H), &stage);
    assert!(!nav.is_scrolled());
    nav.scroll(Viewport::new(51.0, VIEW_H), &stage);
    assert!(nav.is_scrolled());

    let report = nav.unmount();
    assert_eq!(report.listeners, 1);
    nav.scroll(Viewport::new(0.0, VIEW_H), &stage);
    assert!(nav.is_scrolled());
}

#[test]
fn menu_toggle_and_section_jump() {
    let stage = page_stage();
    let mut nav = Navigation::new();
    assert!(matches!(
        nav.toggle_menu(&stage),
        Err(SectionError::NotMounted("navigation"))
    ));
    nav.mount(&stage, &Config::default()).unwrap();
    nav.take_outputs();

    assert!(nav.toggle_menu(&stage).unwrap());
    let out = nav.take_outputs();
    assert_eq!(
        out.last_value("nav/menu", &Property::X),
        Some(Value::percent(100.0))
    );
    nav.update(400, &stage);
    assert_eq!(
        nav.take_outputs().last_value("nav/menu", &Property::X),
        Some(Value::percent(0.0))
    );

    assert_eq!(nav.scroll_to_section("projects", &stage), Some(1_800.0));
    assert!(!nav.is_open());
    assert!(nav.menu_timeline().is_none());
    assert_eq!(nav.scroll_to_section("nowhere", &stage), None);
}

#[test]
fn loading_calls_back_once_after_exit() {
    let stage = page_stage();
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let mut loading = LoadingScreen::new(move || c.set(c.get() + 1));
    assert_eq!(loading.phase(), LoadingPhase::Unmounted);

    loading.mount(&stage, &fast_config()).unwrap();
    assert_eq!(loading.phase(), LoadingPhase::Loading);
    assert_eq!(loading.label(), "0%");

    // 5 ticks at 150 ms, then the 500 ms settle.
    run(&mut loading, 750, &stage);
    assert_eq!(loading.label(), "100%");
    assert_eq!(loading.phase(), LoadingPhase::Loading);
    run(&mut loading, 500, &stage);
    assert_eq!(loading.phase(), LoadingPhase::Exiting);
    assert_eq!(calls.get(), 0);

    run(&mut loading, 1_100, &stage);
    assert_eq!(calls.get(), 1);
    assert!(loading.is_complete());
    run(&mut loading, 2_000, &stage);
    assert_eq!(calls.get(), 1);

    // A finished loader does not mount again.
    loading.unmount();
    loading.mount(&stage, &fast_config()).unwrap();
    assert_eq!(loading.phase(), LoadingPhase::Complete);
    assert!(!loading.is_mounted());
}

#[test]
fn loading_unmounted_early_never_calls_back() {
    let stage = page_stage();
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    let mut loading = LoadingScreen::new(move || c.set(c.get() + 1));
    loading.mount(&stage, &fast_config()).unwrap();
    run(&mut loading, 300, &stage);
    let report = loading.unmount();
    assert_eq!(report.progress, 1);
    run(&mut loading, 5_000, &stage);
    assert_eq!(calls.get(), 0);
}

#[test]
fn footer_particles_offset_by_index() {
    let stage = page_stage();
    let mut footer = Footer::new();
    footer.mount(&stage, &Config::default()).unwrap();
    assert_eq!(footer.particles().len(), 3);
    footer.take_outputs();

    footer.update(600, &stage);
    let out = footer.take_outputs();
    // Particle 2 is still waiting out its 1 s delay.
    assert!(out.last_value("footer/particle-0", &Property::Y).is_some());
    assert!(out.last_value("footer/particle-1", &Property::Y).is_some());
    assert!(out.last_value("footer/particle-2", &Property::Y).is_none());
}

#[test]
fn page_swaps_loader_for_content() {
    let mut stage = page_stage();
    let mut page = Page::new(fast_config());
    page.mount(&stage).unwrap();
    page.scroll(Viewport::new(0.0, VIEW_H), &stage);
    assert!(!page.hero.is_mounted());

    for _ in 0..60 {
        page.update(50, &stage).unwrap();
        let out = page.take_outputs();
        stage.apply(&out);
    }
    assert!(page.is_loaded());
    assert!(!page.loading().is_mounted());
    assert!(page.hero.is_mounted());
    assert!(page.footer.is_mounted());
    assert_eq!(
        stage.value("loading", &Property::Opacity),
        Some(Value::num(0.0))
    );

    page.scroll(Viewport::new(200.0, VIEW_H), &stage);
    let fade = page.about.reveals()[0];
    assert_eq!(state_of(&page.about, fade), Some(PlayState::Forward));

    let report = page.unmount();
    assert_eq!(report.listeners, 1);
    assert!(report.timelines >= 4);
    assert!(!page.hero.is_mounted());
}

#[test]
fn repeated_interaction_does_not_accumulate_timelines() {
    let stage = page_stage();
    let mut contact = ContactSection::new();
    contact.mount(&stage, &Config::default()).unwrap();
    for _ in 0..1_000 {
        contact.focus("contact/name", &stage).unwrap();
        contact.update(16, &stage);
        contact.blur("contact/name", &stage).unwrap();
        contact.update(16, &stage);
    }
    // Two scroll reveals plus the one live focus tween.
    assert_eq!(contact.unmount().timelines, 3);

    let mut nav = Navigation::new();
    nav.mount(&stage, &Config::default()).unwrap();
    for _ in 0..1_000 {
        nav.toggle_menu(&stage).unwrap();
        nav.update(16, &stage);
    }
    assert!(!nav.is_open());
    assert_eq!(nav.unmount().timelines, 0);
}

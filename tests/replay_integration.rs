use color_eyre::eyre::Result;
use hashview::{
    core::{route::ViewId, view::ViewState},
    infrastructure::{config::Config, headless::DomOp, script::Script},
    integration::replay::{ReplayOptions, ReplayRunner},
};
use pretty_assertions::assert_eq;

const GALLERY_ROUND_TRIP: &str = r##"[
  { hover: "#/projects" },
  { click: "#/projects" },
  { wait: 600 },
  { scroll: 500 },
  { click: "#/" },
  { wait: 600 },
  "back",
  { wait: 600 },
]"##;

#[tokio::test(start_paused = true)]
async fn test_gallery_round_trip() -> Result<()> {
    let script = Script::parse(GALLERY_ROUND_TRIP)?;
    let runner = ReplayRunner::new(Config::embedded()?, ReplayOptions::default());

    let report = runner.run(&script).await?;
    let summary = &report.summary;

    assert_eq!(summary.fragment, "#/projects");
    assert_eq!(summary.active_views, vec![ViewId::new("view-projects")]);
    assert_eq!(summary.scroll_y, 500.0);
    assert_eq!(summary.prefetched.len(), 3);
    assert_eq!(summary.router.dropped, 0);
    // Canonical first render plus three swaps
    assert_eq!(summary.router.transitions, 4);

    let hooks = report
        .trace
        .iter()
        .filter(|entry| matches!(entry.op, DomOp::Hook { registered: true, .. }))
        .count();
    assert_eq!(hooks, 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_deep_link_to_section() -> Result<()> {
    let script = Script::parse(r##"[{ wait: 100 }]"##)?;
    let options = ReplayOptions {
        reduced_motion: None,
        initial_fragment: "#/work".into(),
    };

    let report = ReplayRunner::new(Config::embedded()?, options)
        .run(&script)
        .await?;

    assert_eq!(report.summary.fragment, "#/work");
    assert_eq!(report.summary.active_views, vec![ViewId::new("view-home")]);
    assert_eq!(report.summary.scroll_y, 1300.0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_reduced_motion_override() -> Result<()> {
    let script = Script::parse(r##"[{ click: "#/projects" }, { wait: 100 }]"##)?;
    let options = ReplayOptions {
        reduced_motion: Some(true),
        initial_fragment: "#/".into(),
    };

    let report = ReplayRunner::new(Config::embedded()?, options)
        .run(&script)
        .await?;

    assert_eq!(report.summary.active_views, vec![ViewId::new("view-projects")]);
    let home_at = |wanted: ViewState| {
        report
            .trace
            .iter()
            .find(|entry| {
                entry.op
                    == DomOp::ViewState {
                        view: ViewId::new("view-home"),
                        state: wanted,
                    }
            })
            .map(|entry| entry.at_ms)
    };
    let leaving = home_at(ViewState::Leaving);
    assert!(leaving.is_some());
    // No fade: hidden in the same instant
    let hidden_home = report
        .trace
        .iter()
        .filter(|entry| {
            entry.op
                == DomOp::ViewState {
                    view: ViewId::new("view-home"),
                    state: ViewState::Hidden,
                }
        })
        .map(|entry| entry.at_ms)
        .last();
    assert_eq!(leaving, hidden_home);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_same_fragment_click_scrolls_in_place() -> Result<()> {
    let script = Script::parse(r##"[{ scroll: 900 }, { click: "#/" }]"##)?;
    let options = ReplayOptions {
        reduced_motion: None,
        initial_fragment: "#/".into(),
    };

    let report = ReplayRunner::new(Config::embedded()?, options)
        .run(&script)
        .await?;

    assert_eq!(report.summary.scroll_y, 0.0);
    assert_eq!(report.summary.router.transitions, 1);
    assert_eq!(report.summary.runtime.events, 2);
    Ok(())
}

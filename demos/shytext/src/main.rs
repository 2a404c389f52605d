use shy_core::*;
use shy_ui::*;
use std::time::Duration;

const SAMPLE_TEXT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim \
veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo \
consequat. Duis aute irure dolor in reprehenderit in voluptate velit esse cillum \
dolore eu fugiat nulla pariatur. Excepteur sint occaecat cupidatat non proident, \
sunt in culpa qui officia deserunt mollit anim id est laborum. Curabitur mattis \
augue at sapien porta, nec sollicitudin ligula fermentum.";

fn app(_s: &mut Scheduler) -> View {
    ErrorBoundary(
        |err| Text(format!("something went wrong: {}", err.message)),
        || {
            Surface(
                Modifier::new().fill_max_size().background(theme().background),
                Column(Modifier::new().padding(16.0)).child(
                    // card-styled container, the way the sample activity hosts it
                    Box(Modifier::new()
                        .fill_max_width()
                        .background(theme().surface)
                        .border(1.0, theme().outline, 8.0)
                        .clip_rounded(8.0)
                        .padding(4.0))
                    .child(ShyText(
                        SAMPLE_TEXT,
                        ShySpec::lines(3)
                            .more_text("...Read More")
                            .animated(Duration::from_millis(500))
                            .redact(["Lorem", "sit", "mattis"])
                            .font_size(18.0),
                        Modifier::new(),
                    )),
                ),
            )
        },
    )
}

fn widget_height(frame: &Frame) -> Option<f32> {
    frame.hit_regions.first().map(|h| h.rect.h)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting ShyText demo");

    set_clock(Box::new(SystemClock));

    let mut sched = Scheduler::new();
    sched.size = (420, 800);

    let mut frame = sched.compose(app, |v, size| layout_and_paint(v, size));
    log::info!(
        "first frame: {} scene nodes, {} hit regions, collapsed height {:?}",
        frame.scene.nodes.len(),
        frame.hit_regions.len(),
        widget_height(&frame)
    );

    // tap the widget to expand it
    let tapped = dispatch_tap(&frame, Vec2 { x: 210.0, y: 40.0 });
    log::info!("tap dispatched: {tapped}");

    // pump frames until the height transition settles
    let mut last_h = widget_height(&frame);
    for i in 0..120 {
        std::thread::sleep(Duration::from_millis(16));
        frame = sched.compose(app, |v, size| layout_and_paint(v, size));
        let h = widget_height(&frame);
        if i % 8 == 0 {
            log::info!("frame {i}: height {h:?}");
        }
        if h == last_h && i > 2 {
            break;
        }
        last_h = h;
    }
    log::info!("settled expanded height {last_h:?}");

    // collapse again
    if let Some(h) = widget_height(&frame) {
        dispatch_tap(
            &frame,
            Vec2 {
                x: 210.0,
                y: h.min(40.0),
            },
        );
    }
    for _ in 0..120 {
        std::thread::sleep(Duration::from_millis(16));
        frame = sched.compose(app, |v, size| layout_and_paint(v, size));
        let h = widget_height(&frame);
        if h == last_h {
            break;
        }
        last_h = h;
    }
    log::info!("settled collapsed height {:?}", widget_height(&frame));

    Ok(())
}

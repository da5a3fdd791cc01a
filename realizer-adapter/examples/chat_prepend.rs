// Example: a chat timeline that loads older messages above the reader without jumping.
use realizer::{Constraint, Orientation, Rect, Size, StackLayout, VirtualizingEngine};
use realizer_adapter::{KindedFactory, Pooled, Presenter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Kind {
    DayHeader,
    Message,
}

#[derive(Clone, Debug)]
struct Entry {
    kind: Kind,
    text: String,
}

#[derive(Debug, Default)]
struct Bubble {
    text: String,
    lines: usize,
}

fn entries(range: std::ops::Range<usize>) -> Vec<Entry> {
    range
        .map(|i| Entry {
            kind: if i % 10 == 0 { Kind::DayHeader } else { Kind::Message },
            text: format!("message {i}"),
        })
        .collect()
}

fn main() {
    let factory = KindedFactory::new(
        |e: &Entry, _| e.kind,
        |b: &mut Bubble, e: &Entry, _| {
            b.text.clone_from(&e.text);
            b.lines = 1 + e.text.len() % 3;
        },
    )
    .with_kind(Kind::DayHeader, Bubble::default)
    .with_kind(Kind::Message, Bubble::default);
    let layout = StackLayout::new(
        Orientation::Vertical,
        |p: &mut Pooled<Kind, Bubble>, _: usize, c: Constraint| {
            let height = match p.kind {
                Kind::DayHeader => 32.0,
                Kind::Message => 18.0 * p.element.lines as f64,
            };
            Size::new(c.width.unwrap_or(320.0), height)
        },
        |_: &mut Pooled<Kind, Bubble>, _: usize, _: Rect| {},
    );
    let engine = VirtualizingEngine::new(factory, layout);
    let mut presenter = Presenter::new(entries(1000..1200), engine, Size::new(320.0, 480.0));

    presenter.scroll_to(1_000.0);
    let first = presenter.visible_indices().start;
    println!(
        "before: offset={} first visible={:?}",
        presenter.surface().offset(),
        presenter.element(first).map(|p| &p.element.text)
    );

    presenter.insert_many(0, entries(900..1000));
    let first = presenter.visible_indices().start;
    println!(
        "after prepend: offset={} first visible={:?}",
        presenter.surface().offset(),
        presenter.element(first).map(|p| &p.element.text)
    );
    println!("pool stats: {:?}", presenter.engine().factory().stats());
}

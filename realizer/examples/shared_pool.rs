// Example: two engines drawing elements from one shared recycle pool.
use std::cell::RefCell;
use std::rc::Rc;

use realizer::{
    Constraint, ElementFactory, EngineOptions, Orientation, OwnerId, Rect, ScrollHost, Size,
    StackLayout, VirtualizingEngine,
};

#[derive(Default)]
struct Pool {
    idle: Vec<String>,
    created: usize,
    reused: usize,
}

impl ElementFactory<&'static str> for Pool {
    type Element = String;

    fn get_or_create(&mut self, item: &&'static str, index: usize, owner: OwnerId) -> String {
        let mut element = match self.idle.pop() {
            Some(element) => {
                self.reused += 1;
                element
            }
            None => {
                self.created += 1;
                String::new()
            }
        };
        element.clear();
        element.push_str(&format!("{item} #{index} (engine {})", owner.0));
        element
    }

    fn recycle(&mut self, element: String) {
        self.idle.push(element);
    }
}

struct Host;

impl ScrollHost<String> for Host {
    fn bring_into_view(&mut self, _element: &String, _rect: Rect) -> Option<Rect> {
        None
    }
}

fn layout() -> StackLayout<
    impl FnMut(&mut String, usize, Constraint) -> Size,
    impl FnMut(&mut String, usize, Rect),
> {
    StackLayout::new(
        Orientation::Vertical,
        |_: &mut String, _: usize, _: Constraint| Size::new(100.0, 20.0),
        |_: &mut String, _: usize, _: Rect| {},
    )
}

fn main() {
    let pool = Rc::new(RefCell::new(Pool::default()));
    let items = vec!["item"; 10_000];
    let available = Constraint::new(Some(100.0), None);

    let mut left = VirtualizingEngine::with_options(
        Rc::clone(&pool),
        layout(),
        EngineOptions::new().with_owner(OwnerId(1)),
    );
    let mut right = VirtualizingEngine::with_options(
        Rc::clone(&pool),
        layout(),
        EngineOptions::new().with_owner(OwnerId(2)),
    );

    left.on_viewport_changed(Rect::new(0.0, 0.0, 100.0, 100.0));
    left.layout(&items, available, &mut Host);

    // Scrolling far away returns the left engine's elements to the pool...
    left.on_viewport_changed(Rect::new(0.0, 50_000.0, 100.0, 100.0));
    left.layout(&items, available, &mut Host);
    left.detach();

    // ...where the right engine picks them up.
    right.on_viewport_changed(Rect::new(0.0, 0.0, 100.0, 100.0));
    right.layout(&items, available, &mut Host);

    let pool = pool.borrow();
    println!("created={} reused={}", pool.created, pool.reused);
    for (_, element) in right.realized_elements() {
        println!("{element}");
    }
}

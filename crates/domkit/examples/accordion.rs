//! Accordion example - an expanding/collapsing widget built as a plain caller
//! of the public API

use domkit::{squash_event, Document, ElementSpec, Event, Listener, Serializer};
use std::cell::RefCell;
use std::rc::Rc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let mut doc = Document::new();

    // Track which section is open; the accordion keeps at most one expanded.
    let open_section: Rc<RefCell<Option<usize>>> = Rc::new(RefCell::new(None));

    let root = doc.create("div#accordion.widget")?;
    let mut headers = Vec::new();

    for (index, (title, body)) in [
        ("First", "alpha content"),
        ("Second", "beta content"),
        ("Third", "gamma content"),
    ]
    .into_iter()
    .enumerate()
    {
        let open = Rc::clone(&open_section);
        let header = doc.create_element(
            ElementSpec::new("h3.accordion-header")
                .attr("data-section", index.to_string())
                .child(title)
                .listen(
                    "click",
                    Listener::new(move |event| {
                        let mut current = open.borrow_mut();
                        *current = if *current == Some(index) {
                            None
                        } else {
                            Some(index)
                        };
                        squash_event(event);
                    }),
                ),
        )?;
        let panel = doc.create_element(ElementSpec::new("div.accordion-panel").child(body))?;
        doc.append_children(root, [header, panel])?;
        headers.push(header);
    }

    // Click the second header, then print the state and the markup.
    let mut click = Event::new("click");
    doc.dispatch(headers[1], &mut click)?;
    println!("open section: {:?}", open_section.borrow());
    println!("default prevented: {}", click.default_prevented());

    let markup = Serializer::new().serialize(&doc, root)?;
    println!("{markup}");

    Ok(())
}

use clap::Parser;
use log::{info, warn};
use quotekit::config::Args;
use quotekit::controller::{AutocompleteController, ControllerBuilder};
use quotekit::editor::TextInput;
use quotekit::palette::SuggestionList;
use quotekit::quote::{self, Quote};
use quotekit::surface::{InputSurface, Key, OutputSurface, PointerTarget, TextEdit, UiEvent};
use quotekit::vocabulary;
use std::error::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep_until, Instant};

type Controller = AutocompleteController<TextInput, SuggestionList>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let products = match &args.vocabulary {
        Some(path) => vocabulary::load(path)?,
        None => vocabulary::default_products(),
    };
    info!("starting with {} products", products.len());

    let mut controller: Controller = ControllerBuilder::new()
        .input(TextInput::new())
        .output(SuggestionList::new())
        .vocabulary(products)
        .config(args.autocomplete())
        .build()?;
    let mut quote = Quote::new("MOSTRADOR")?;

    println!("Type a product name.");
    println!("Navigate: :down :up :enter :tab :esc :pick N");
    println!("Quote: :add QTY PRICE :client NAME :show :quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let now = Instant::now();

        match command {
            ":quit" => break,
            ":down" => key(&mut controller, Key::ArrowDown),
            ":up" => key(&mut controller, Key::ArrowUp),
            ":enter" => key(&mut controller, Key::Enter),
            ":tab" => key(&mut controller, Key::Tab),
            ":esc" => key(&mut controller, Key::Escape),
            ":pick" => match rest.trim().parse::<usize>() {
                Ok(n) if n > 0 => {
                    let target = PointerTarget::Suggestion(n - 1);
                    controller.handle_event(UiEvent::PointerDown(target), now);
                }
                _ => warn!("usage: :pick N"),
            },
            ":client" => {
                if let Err(e) = quote.set_client(rest) {
                    println!("error: {}", e);
                }
            }
            ":add" => add_item(&mut quote, &controller, rest),
            ":show" => match quote.render_table(&args.currency) {
                Ok(table) => print!("{}", table),
                Err(e) => println!("error: {}", e),
            },
            _ => {
                let edit = TextEdit::Replace(line.to_string());
                controller.handle_event(UiEvent::Edit(edit), now);
                if let Some(deadline) = controller.next_deadline() {
                    sleep_until(deadline).await;
                    controller.poll(Instant::now());
                }
            }
        }

        print_suggestions(&controller);
    }

    controller.destroy();
    Ok(())
}

fn key(controller: &mut Controller, key: Key) {
    controller.handle_event(UiEvent::Key(key), Instant::now());
}

fn add_item(quote: &mut Quote, controller: &Controller, args: &str) {
    let mut parts = args.split_whitespace();
    let (Some(qty), Some(price)) = (parts.next(), parts.next()) else {
        println!("usage: :add QTY PRICE");
        return;
    };
    let Ok(quantity) = qty.parse::<u32>() else {
        println!("error: invalid quantity {:?}", qty);
        return;
    };
    let product = controller.input().value();
    let result = quote::parse_price(price)
        .and_then(|cents| quote.add_item(&product, quantity, cents).map(|_| ()));
    if let Err(e) = result {
        println!("error: {}", e);
    }
}

fn print_suggestions(controller: &Controller) {
    let list = controller.output();
    println!("> {}", controller.input().value());
    if !list.is_visible() {
        return;
    }
    for (i, item) in list.items().iter().enumerate() {
        let marker = if list.is_highlighted(i) { '*' } else { ' ' };
        let text: String = item
            .segments
            .iter()
            .map(|s| {
                if s.emphasized {
                    format!("[{}]", s.text)
                } else {
                    s.text.clone()
                }
            })
            .collect();
        println!("{} {:>2}. {}", marker, i + 1, text);
    }
}

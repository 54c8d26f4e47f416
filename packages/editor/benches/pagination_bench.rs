use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use slugline_editor::{
    paginate, ASTDocument, Document, EditorSession, LineBudget, Mutation, Pipeline, Settings,
};
use slugline_parser::parse_plain_text;

fn feature_script(scenes: usize) -> ASTDocument {
    let mut text = String::new();
    for scene in 0..scenes {
        text.push_str(&format!("INT. WAREHOUSE {} - NIGHT\n\n", scene));
        text.push_str("Rain hammers the roof. A single bulb swings overhead, throwing long shadows.\n\n");
        text.push_str("MARA\n(whispering)\nDid you hear that? Somebody is on the stairs.\n\n");
        text.push_str("DEV\nIt's the wind. It's always the wind in this place.\n\n");
        text.push_str("CUT TO:\n\n");
    }
    parse_plain_text(&text).expect("sample imports")
}

fn paginate_feature(c: &mut Criterion) {
    let budget = LineBudget::default();
    let settings = Settings::default();
    let unpaged = feature_script(120);

    c.bench_function("paginate_feature_from_one_page", |b| {
        b.iter_batched(
            || unpaged.clone(),
            |mut doc| paginate(black_box(&mut doc), &budget, &settings),
            BatchSize::SmallInput,
        )
    });

    let mut settled = unpaged.clone();
    paginate(&mut settled, &budget, &settings);
    c.bench_function("paginate_settled_feature", |b| {
        b.iter_batched(
            || settled.clone(),
            |mut doc| paginate(black_box(&mut doc), &budget, &settings),
            BatchSize::SmallInput,
        )
    });
}

fn typing_through_pipeline(c: &mut Criterion) {
    let mut seed = EditorSession::new(
        "bench",
        Document::new("bench.slug", feature_script(60), Default::default()),
        Settings::default(),
    );
    seed.paginate(&LineBudget::default());

    c.bench_function("type_line_and_enter", |b| {
        b.iter_batched(
            || Pipeline::new(seed.clone(), LineBudget::default()),
            |mut p| {
                for (i, ch) in "The door creaks open.".chars().enumerate() {
                    p.apply(Mutation::InsertText { text: ch.to_string() }, i as u64 * 50)
                        .expect("typing applies");
                }
                p.apply(Mutation::Enter, 2_000).expect("enter applies");
                p
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, paginate_feature, typing_through_pipeline);
criterion_main!(benches);

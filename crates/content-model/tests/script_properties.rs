use proptest::prelude::*;
use robovid_content_model::{Content, RenderScript, Sentence};

fn arb_sentence() -> impl Strategy<Value = Sentence> {
    (
        "[A-Za-z ,]{1,40}\\.",
        prop::collection::vec("[a-z]{1,10}", 0..3),
        prop::collection::vec("[0-9]-[a-z]{4,9}\\.png", 0..3),
    )
        .prop_map(|(text, keywords, images)| Sentence {
            text,
            keywords,
            images,
        })
}

fn arb_content() -> impl Strategy<Value = Content> {
    ("[A-Za-z ]{1,20}", prop::collection::vec(arb_sentence(), 0..8)).prop_map(
        |(term, sentences)| {
            let mut content = Content::new(term, sentences.len());
            content.sentences = sentences;
            content
        },
    )
}

proptest! {
    #[test]
    fn build_is_deterministic(content in arb_content()) {
        let a = RenderScript::build(&content).to_descriptor().unwrap();
        let b = RenderScript::build(&content.clone()).to_descriptor().unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn segments_mirror_sentences(content in arb_content()) {
        let script = RenderScript::build(&content);
        prop_assert_eq!(script.segments.len(), content.sentences.len());
        for (i, (segment, sentence)) in script.segments.iter().zip(&content.sentences).enumerate() {
            prop_assert_eq!(segment.index, i);
            prop_assert_eq!(&segment.text, &sentence.text);
        }
    }
}

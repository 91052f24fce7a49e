// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_slide_deck(slides: usize) -> String {
    let mut content = String::from(
        "# Benchmark deck\nA generated talk\n15:04 2 Jan 2006\nTags: bench, slides\n\nBench Author\nPerformance, Example Corp\n<@bench_author>\n\n",
    );

    for slide in 0..slides {
        let heading = if slide % 4 == 0 { "##" } else { "###" };
        content.push_str(&format!("{heading} Slide {slide}\n\n"));
        content.push_str("Some paragraph with *emphasis*, `code` and a handle <@gopher>.\n\n");
        for i in 0..3 {
            content.push_str(&format!("- Point {i} with <https://example.com/{slide}/{i}>\n"));
        }
        content.push('\n');
        if slide % 3 == 0 {
            content.push_str("```go\nfunc main() {\n\tfmt.Println(\"<@not_a_link>\")\n}\n```\n\n");
        }
    }

    content
}

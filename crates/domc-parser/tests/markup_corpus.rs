//! Parses representative component files and checks the resulting tree outline.

use domc_parser::{parse, AttributeValue, MarkupNode};
use pretty_assertions::assert_eq;

/// Renders a compact, indentation-based outline of a markup tree.
fn outline(nodes: &[MarkupNode], depth: usize, out: &mut String) {
    for node in nodes {
        let pad = "  ".repeat(depth);
        match node {
            MarkupNode::Element(el) => {
                out.push_str(&format!("{}<{}>", pad, el.name));
                for attr in &el.attributes {
                    let value = match &attr.value {
                        AttributeValue::True => "true".to_string(),
                        AttributeValue::Text(t) => format!("{:?}", t.value),
                        AttributeValue::Expression(e) => format!("{{{}}}", e.expression),
                    };
                    out.push_str(&format!(" {}={}", attr.name, value));
                }
                out.push('\n');
                outline(&el.children, depth + 1, out);
            }
            MarkupNode::Text(text) => out.push_str(&format!("{}text {:?}\n", pad, text.data)),
            MarkupNode::Comment(c) => out.push_str(&format!("{}comment {:?}\n", pad, c.data)),
        }
    }
}

fn outline_of(source: &str) -> String {
    let result = parse(source);
    assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
    let mut out = String::new();
    outline(&result.document.nodes, 0, &mut out);
    out
}

#[test]
fn counter_component() {
    let source = r#"<script>
  export let count = 0;
  function increment() { count += 1; }
</script>

<button class="primary" on:click="increment()">
  Clicked {count} times
</button>
"#;

    let expected = r#"<script>
  text "\n  export let count = 0;\n  function increment() { count += 1; }\n"
text "\n\n"
<button> class="primary" on:click="increment()"
  text "\n  Clicked {count} times\n"
text "\n"
"#;
    assert_eq!(outline_of(source), expected);
}

#[test]
fn nested_markup_with_comment_and_void_element() {
    let source = "<div id=app><!-- header --><h1>Hi</h1><br><p>a<em>b</em>c</p></div>";

    let expected = r#"<div> id="app"
  comment " header "
  <h1>
    text "Hi"
  <br>
  <p>
    text "a"
    <em>
      text "b"
    text "c"
"#;
    assert_eq!(outline_of(source), expected);
}

#[test]
fn multiline_start_tag() {
    let source = "<input\n  type=\"checkbox\"\n  checked\n  on:change={toggle}\n/>";

    let expected = "<input> type=\"checkbox\" checked=true on:change={toggle}\n";
    assert_eq!(outline_of(source), expected);
}

#[test]
fn spans_slice_back_to_source() {
    let source = "<p title=\"t\">Hello {name}!</p>";
    let result = parse(source);
    let MarkupNode::Element(p) = &result.document.nodes[0] else {
        panic!("expected element");
    };
    let attr = &p.attributes[0];
    assert_eq!(&source[attr.name_span.start_usize()..attr.name_span.end_usize()], "title");
    let MarkupNode::Text(text) = &p.children[0] else {
        panic!("expected text");
    };
    assert_eq!(&source[text.span.start_usize()..text.span.end_usize()], "Hello {name}!");
}

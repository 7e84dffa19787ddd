use serde_json::json;

use crate::context::Context;

use super::{render_template, Review};

#[test]
fn render_simple_for() {
    let mut context = Context::new();
    context.insert("counts", &vec![1, 2, 3]);

    let result = render_template("test{{for:i:counts}} {{i}}{{endfor}}", &context);
    assert_eq!(result.unwrap(), "test 1 2 3");
}

#[test]
fn nested_loops_iterate_outer_then_inner() {
    let mut context = Context::new();
    context.insert("steps", &vec![-1, 1]);

    let tpl = "test{{for:x:steps}}{{for:y:steps}} ({{x}},{{y}}){{endfor}}{{endfor}}";
    assert_eq!(render_template(tpl, &context).unwrap(), "test (-1,-1) (-1,1) (1,-1) (1,1)");
}

#[test]
fn for_with_index_key() {
    let mut context = Context::new();
    context.insert("names", &vec!["a", "b"]);

    let result = render_template("{{for:name:i:names}}{{i}}={{name}};{{endfor}}", &context);
    assert_eq!(result.unwrap(), "0=a;1=b;");
}

#[test]
fn for_over_mapping_in_order() {
    let mut context = Context::new();
    context.insert("data", &json!({"b": 2, "a": 1}));

    let result = render_template("{{for:v:k:data}}{{k}}:{{v}} {{endfor}}", &context);
    if cfg!(feature = "preserve_order") {
        assert_eq!(result.unwrap(), "b:2 a:1 ");
    } else {
        assert_eq!(result.unwrap(), "a:1 b:2 ");
    }
}

#[test]
fn loop_variable_shadows_context_and_is_dropped_after() {
    let mut context = Context::new();
    context.insert("x", &"outer");
    context.insert("xs", &vec!["inner"]);

    let result = render_template("{{for:x:xs}}{{x}} {{endfor}}{{x}}", &context);
    assert_eq!(result.unwrap(), "inner outer");
}

#[test]
fn loop_body_sees_outer_loop_variables() {
    let mut context = Context::new();
    context.insert("rows", &json!([{"cells": [1, 2]}, {"cells": [3]}]));

    let tpl = "{{for:row:r:rows}}{{for:cell:row.cells}}{{r}}.{{cell}} {{endfor}}{{endfor}}";
    assert_eq!(render_template(tpl, &context).unwrap(), "0.1 0.2 1.3 ");
}

#[test]
fn for_over_struct_field() {
    let mut context = Context::new();
    context.insert("review", &Review::new());

    let result = render_template("{{for:p:review.paragraphs}}<p>{{p}}</p>{{endfor}}", &context);
    assert_eq!(result.unwrap(), "<p>A</p><p>B</p><p>C</p>");
}

#[test]
fn for_container_can_be_filtered() {
    let mut context = Context::new();
    context.insert("data", &json!({"x": 1, "y": 2}));

    let result = render_template("{{for:k:data|keys|reverse}}{{k}}{{endfor}}", &context);
    assert_eq!(result.unwrap(), "yx");
}

#[test]
fn for_over_empty_array_renders_nothing() {
    let mut context = Context::new();
    context.insert("empty", &Vec::<usize>::new());

    assert_eq!(render_template("a{{for:x:empty}}{{x}}{{endfor}}b", &context).unwrap(), "ab");
}

#[test]
fn if_inside_for() {
    let mut context = Context::new();
    context.insert("nums", &vec![1, 2, 3, 4]);

    let tpl = "{{for:n:nums}}{{if:n % 2 == 0}}e{{else}}o{{endif}}{{endfor}}";
    assert_eq!(render_template(tpl, &context).unwrap(), "oeoe");
}

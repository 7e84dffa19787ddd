use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::sync::Arc;

use globwalk::GlobWalkerBuilder;
use log::debug;

use crate::builtins::filters::{array, common, number, object, string, Filter, Raw};
use crate::context::Context;
use crate::errors::{Error, Result};
use crate::renderer::Renderer;
use crate::template::Template;
use crate::utils::escape_html;

/// The name of the template used for `Engine::render_str` and `Engine::one_off`
const ONE_OFF_TEMPLATE_NAME: &str = "__stache_one_off";

/// Default limit on nested `if`/`for` bodies
const DEFAULT_MAX_DEPTH: usize = 64;

/// How non-raw output is escaped, fixed when the `Engine` is built
#[derive(Clone, Copy)]
pub enum Escape {
    /// Encode `& < > " '` as HTML entities
    Html,
    /// Output as-is
    None,
    /// Any other policy
    Custom(fn(&str) -> String),
}

impl Escape {
    /// Escapes `input` according to the policy
    pub fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        match *self {
            Escape::Html => Cow::Owned(escape_html(input)),
            Escape::None => Cow::Borrowed(input),
            Escape::Custom(f) => Cow::Owned(f(input)),
        }
    }
}

impl Default for Escape {
    fn default() -> Escape {
        Escape::Html
    }
}

impl fmt::Debug for Escape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Escape::Html => write!(f, "Html"),
            Escape::None => write!(f, "None"),
            Escape::Custom(_) => write!(f, "Custom(fn)"),
        }
    }
}

/// Main point of interaction in this library.
///
/// Holds the filters, the escaping policy and optionally a set of
/// parsed templates that can be rendered by name.
#[derive(Clone)]
pub struct Engine {
    #[doc(hidden)]
    pub templates: HashMap<String, Template>,
    #[doc(hidden)]
    pub filters: HashMap<String, Arc<dyn Filter>>,
    #[doc(hidden)]
    pub escape: Escape,
    #[doc(hidden)]
    pub max_depth: usize,
}

impl Engine {
    /// Create a new instance of Stache with the given escaping policy.
    ///
    /// Only the `raw` filter is registered, any other filter name is reported
    /// as not found until registered. See [`Engine::with_builtins`].
    ///
    /// ```
    /// use stache::{Context, Engine, Escape};
    ///
    /// let engine = Engine::new(Escape::None);
    /// let mut context = Context::new();
    /// context.insert("name", "<b>world</b>");
    /// assert_eq!(engine.render_str("hello {{name}}", &context).unwrap(), "hello <b>world</b>");
    /// ```
    pub fn new(escape: Escape) -> Engine {
        let mut engine = Engine {
            templates: HashMap::new(),
            filters: HashMap::new(),
            escape,
            max_depth: DEFAULT_MAX_DEPTH,
        };
        engine.register_filter("raw", Raw);
        engine
    }

    /// Same as [`Engine::new`] with the filter library registered as well:
    /// `upper`, `lower`, `trim`, `truncate`, `replace`, `length`, `join`, `date`...
    ///
    /// ```
    /// use stache::{Context, Engine, Escape};
    ///
    /// let engine = Engine::with_builtins(Escape::Html);
    /// let mut context = Context::new();
    /// context.insert("tags", &vec!["a", "b"]);
    /// assert_eq!(engine.render_str("{{tags|join(\", \")|upper}}", &context).unwrap(), "A, B");
    /// ```
    pub fn with_builtins(escape: Escape) -> Engine {
        let mut engine = Engine::new(escape);
        engine.register_builtin_filters();
        engine
    }

    /// Sets how deep `if`/`for` bodies may nest before rendering fails
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// Escapes text with the policy the engine was built with
    pub fn escape<'a>(&self, input: &'a str) -> Cow<'a, str> {
        self.escape.apply(input)
    }

    /// Register a filter with Stache.
    ///
    /// If a filter with that name already exists, it will be overwritten
    ///
    /// ```rust
    /// # use stache::{Engine, Escape, Result, Value};
    /// let mut engine = Engine::new(Escape::Html);
    /// engine.register_filter("double", |value: &Value, _: &[Value]| -> Result<Value> {
    ///     Ok(Value::from(value.as_i64().unwrap_or(0) * 2))
    /// });
    /// ```
    pub fn register_filter<F: Filter + 'static>(&mut self, name: &str, filter: F) {
        self.filters.insert(name.to_string(), Arc::new(filter));
    }

    /// Registers the filter library, replacing user filters of the same names
    pub fn register_builtin_filters(&mut self) {
        self.register_filter("upper", string::upper);
        self.register_filter("lower", string::lower);
        self.register_filter("trim", string::trim);
        self.register_filter("truncate", string::truncate);
        self.register_filter("replace", string::replace);
        self.register_filter("capitalize", string::capitalize);
        self.register_filter("title", string::title);
        self.register_filter("striptags", string::striptags);
        self.register_filter("escape", string::escape_html);
        #[cfg(feature = "urlencode")]
        self.register_filter("urlencode", string::urlencode);
        #[cfg(feature = "urlencode")]
        self.register_filter("urlencode_strict", string::urlencode_strict);
        #[cfg(feature = "slug")]
        self.register_filter("slugify", string::slugify);

        self.register_filter("abs", number::abs);
        self.register_filter("round", number::round);
        #[cfg(feature = "humansize")]
        self.register_filter("filesizeformat", number::filesizeformat);

        self.register_filter("first", array::first);
        self.register_filter("last", array::last);
        self.register_filter("join", array::join);

        self.register_filter("keys", object::keys);
        self.register_filter("values", object::values);

        self.register_filter("length", common::length);
        self.register_filter("reverse", common::reverse);
        self.register_filter("json_encode", common::json_encode);
        self.register_filter("default", common::default);
        #[cfg(feature = "chrono")]
        self.register_filter("date", common::date);
    }

    /// Renders a template given as a string, parsing it on every call.
    ///
    /// ```
    /// # use stache::{Context, Engine};
    /// let engine = Engine::default();
    /// let mut context = Context::new();
    /// context.insert("counts", &vec![1, 2, 3]);
    /// let out = engine.render_str("test{{for:i:counts}} {{i}}{{endfor}}", &context).unwrap();
    /// assert_eq!(out, "test 1 2 3");
    /// ```
    pub fn render_str(&self, input: &str, context: &Context) -> Result<String> {
        let template = Template::new(ONE_OFF_TEMPLATE_NAME, None, input);
        Renderer::new(&template, self, context).render()
    }

    /// Renders a one off template (for example a template coming from a user
    /// input) given a `Context` and the escaping policy to use.
    ///
    /// ```
    /// # use stache::{Context, Engine, Escape};
    /// let mut context = Context::new();
    /// context.insert("greeting", &"hello");
    /// let out = Engine::one_off("{{greeting}} world", &context, Escape::Html).unwrap();
    /// assert_eq!(out, "hello world");
    /// ```
    pub fn one_off(input: &str, context: &Context, escape: Escape) -> Result<String> {
        Engine::new(escape).render_str(input, context)
    }

    /// Add a single template to the Stache instance, replacing any existing
    /// template of the same name.
    pub fn add_raw_template(&mut self, name: &str, content: &str) {
        debug!("Adding template '{}'", name);
        self.templates.insert(name.to_string(), Template::new(name, None, content));
    }

    /// Add all the templates given to the Stache instance
    ///
    /// ```rust
    /// # use stache::Engine;
    /// let mut engine = Engine::default();
    /// engine.add_raw_templates(vec![
    ///     ("new.html", "<p>{{name}}</p>"),
    ///     ("new2.html", "<p>{{name|upper}}</p>"),
    /// ]);
    /// assert_eq!(engine.template_names().count(), 2);
    /// ```
    pub fn add_raw_templates<I, N, C>(&mut self, templates: I)
    where
        I: IntoIterator<Item = (N, C)>,
        N: AsRef<str>,
        C: AsRef<str>,
    {
        for (name, content) in templates {
            self.add_raw_template(name.as_ref(), content.as_ref());
        }
    }

    /// Add a single template from a path. If a name is not given, the path
    /// is used as the template name.
    pub fn add_template_file<P: AsRef<Path>>(&mut self, path: P, name: Option<&str>) -> Result<()> {
        let path = path.as_ref();
        let tpl_name = name.map(|n| n.to_string()).unwrap_or_else(|| path.to_string_lossy().to_string());

        let mut f = File::open(path)
            .map_err(|e| Error::chain(format!("Couldn't open template '{:?}'", path), e))?;
        let mut input = String::new();
        f.read_to_string(&mut input)
            .map_err(|e| Error::chain(format!("Failed to read template '{:?}'", path), e))?;

        debug!("Adding template '{}' from {:?}", tpl_name, path);
        let tpl = Template::new(&tpl_name, Some(path.to_string_lossy().to_string()), &input);
        self.templates.insert(tpl_name, tpl);
        Ok(())
    }

    /// Loads every file matching the glob, naming each one by its path relative
    /// to the part of the glob before the first `*`, with `/` separators.
    ///
    /// Templates already added are kept unless a file has the same name.
    pub fn load_glob(&mut self, glob: &str) -> Result<()> {
        let star = glob.find('*').ok_or_else(|| {
            Error::msg(format!("Stache expects a glob as input, no * were found in `{}`", glob))
        })?;
        let (parent_dir, glob_end) = glob.split_at(star);
        let parent_dir = if parent_dir.is_empty() { "." } else { parent_dir };
        let parent_dir = std::fs::canonicalize(parent_dir)?;

        let walker = GlobWalkerBuilder::new(&parent_dir, glob_end)
            .follow_links(true)
            .build()
            .map_err(|e| Error::msg(format!("Invalid glob `{}`: {}", glob, e)))?;

        for entry in walker.filter_map(std::result::Result::ok) {
            let path = entry.into_path();
            // We only care about actual files
            if !path.is_file() {
                continue;
            }

            let name = path
                .strip_prefix(&parent_dir)
                .map_err(|e| Error::chain(format!("Couldn't name template '{:?}'", path), e))?
                .to_string_lossy()
                // unify on forward slash
                .replace('\\', "/");
            self.add_template_file(&path, Some(&name))?;
        }

        Ok(())
    }

    /// Returns a template by name or an error if not found
    pub fn get_template(&self, template_name: &str) -> Result<&Template> {
        self.templates.get(template_name).ok_or_else(|| Error::template_not_found(template_name))
    }

    /// Returns an iterator over the names of all registered templates in an
    /// unspecified order.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    /// Renders a Stache template given a `Context`.
    ///
    /// ```
    /// # use stache::{Context, Engine, Escape};
    /// let mut engine = Engine::with_builtins(Escape::Html);
    /// engine.add_raw_template("hello", "Hello {{name|capitalize}}");
    /// let mut context = Context::new();
    /// context.insert("name", "world");
    /// assert_eq!(engine.render("hello", &context).unwrap(), "Hello World");
    /// ```
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        let template = self.get_template(template_name)?;
        Renderer::new(template, self, context).render()
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new(Escape::default())
    }
}

// Needs a manual implementation since borrow checker can't derive it
impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Engine {{")?;
        writeln!(f, "\n\ttemplates: [")?;

        for template in self.templates.keys() {
            writeln!(f, "\t\t{},", template)?;
        }
        write!(f, "\t]")?;
        writeln!(f, "\n\tfilters: [")?;

        for filter in self.filters.keys() {
            writeln!(f, "\t\t{},", filter)?;
        }
        write!(f, "\t]")?;
        writeln!(f, "\n\tescape: {:?},", self.escape)?;
        writeln!(f, "\tmax_depth: {}", self.max_depth)?;

        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn engine_is_send_and_sync() {
        fn test_send_sync<T: Send + Sync>() {}

        test_send_sync::<Engine>();
    }

    #[test]
    fn custom_escape_is_applied() {
        fn shout(input: &str) -> String {
            input.to_uppercase()
        }
        let mut context = Context::new();
        context.insert("x", "hey");
        let out = Engine::one_off("{{x}} {{x|raw}}", &context, Escape::Custom(shout)).unwrap();
        assert_eq!(out, "HEY hey");
    }

    #[test]
    fn user_filter_overrides_builtin() {
        let mut engine = Engine::with_builtins(Escape::Html);
        engine.register_filter("upper", |_: &crate::Value, _: &[crate::Value]| -> Result<crate::Value> {
            Ok(crate::Value::from("overridden"))
        });
        let mut context = Context::new();
        context.insert("x", "hey");
        assert_eq!(engine.render_str("{{x|upper}}", &context).unwrap(), "overridden");
    }

    #[test]
    fn new_engine_only_knows_raw() {
        let mut context = Context::new();
        context.insert("name", "world");

        let engine = Engine::default();
        assert_eq!(engine.filters.keys().collect::<Vec<_>>(), vec!["raw"]);
        assert_eq!(
            engine.render_str("hello {{name|upper}}", &context).unwrap(),
            "hello {{name|upper!!function &#039;upper&#039; not found}}"
        );
        assert_eq!(
            Engine::with_builtins(Escape::Html).render_str("hello {{name|upper}}", &context).unwrap(),
            "hello WORLD"
        );
    }

    #[test]
    fn builtins_can_be_added_later() {
        let mut engine = Engine::new(Escape::None);
        engine.register_builtin_filters();
        let mut context = Context::new();
        context.insert("xs", &vec![1, 2, 3]);
        assert_eq!(engine.render_str("{{xs|length}}", &context).unwrap(), "3");
    }

    #[test]
    fn missing_template_is_an_error() {
        let engine = Engine::default();
        let err = engine.render("nope", &Context::new()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TemplateNotFound(ref name) if name == "nope"));
        assert_eq!(err.to_string(), "Template 'nope' not found");
    }

    #[test]
    fn raw_templates_replace_by_name() {
        let mut engine = Engine::default();
        engine.add_raw_template("a", "one");
        engine.add_raw_template("a", "two");
        assert_eq!(engine.template_names().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(engine.render("a", &Context::new()).unwrap(), "two");
    }

    #[test]
    fn glob_without_star_is_an_error() {
        let mut engine = Engine::default();
        assert!(engine.load_glob("templates/").is_err());
    }

    #[test]
    fn debug_lists_filters() {
        let engine = Engine::new(Escape::None);
        let out = format!("{:?}", engine);
        assert!(out.contains("raw,"));
        assert!(out.contains("escape: None"));
    }
}

//! The default HTML5 element tables.
//!
//! [§ 3.2.5 Content models](https://html.spec.whatwg.org/multipage/dom.html#content-models)
//!
//! Content models are approximated with two categories: `%phrasing` and
//! `%flow` (phrasing plus block-level flow content). `#text` and `#comment`
//! are ordinary entries of the child sets.

/// Attributes every element accepts.
///
/// [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes)
pub const GLOBAL_ATTRIBUTES: &str = "id accesskey class dir lang style tabindex title role \
     translate hidden contenteditable draggable spellcheck";

/// [§ 3.2.5.2.5 Phrasing content](https://html.spec.whatwg.org/multipage/dom.html#phrasing-content)
pub const PHRASING_CONTENT: &str = "a abbr b bdi bdo br button canvas cite code data datalist \
     del dfn em embed i iframe img input ins kbd label map mark meter noscript object output \
     picture progress q ruby s samp script select small span strong sub sup textarea time u \
     var video audio wbr #text #comment";

/// [§ 3.2.5.2.2 Flow content](https://html.spec.whatwg.org/multipage/dom.html#flow-content),
/// minus the phrasing part.
pub const BLOCK_CONTENT: &str = "address article aside blockquote details dialog div dl \
     fieldset figure footer form h1 h2 h3 h4 h5 h6 header hgroup hr main menu nav ol p pre \
     section style table ul";

/// Elements whose content is parsed as raw text or RCDATA.
///
/// [§ 13.2.5.2 RCDATA / RAWTEXT](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
pub const SPECIAL_ELEMENTS: &str =
    "script noscript iframe noframes noembed title style textarea xmp plaintext";

/// [§ 13.1.2 Void elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
pub const VOID_ELEMENTS: &str = "area base basefont br col frame hr img input isindex link \
     meta param embed source wbr track";

/// Elements that count as content even when they have no children.
pub const NON_EMPTY_ELEMENTS: &str = "td th iframe video audio object script code";

/// Elements whose whitespace is significant.
pub const WHITESPACE_ELEMENTS: &str =
    "pre script noscript style textarea video audio iframe object code";

/// Block elements that directly hold text.
pub const TEXT_BLOCK_ELEMENTS: &str = "h1 h2 h3 h4 h5 h6 p div address pre form blockquote \
     center dir fieldset header footer article section hgroup aside main nav figure";

/// Block elements that are not text blocks.
pub const BLOCK_ELEMENTS: &str = "hr table tbody thead tfoot th tr td li ol ul caption dl dt dd \
     noscript menu isindex option datalist select optgroup figcaption details summary html \
     body multicol listing";

/// Elements that may hold text as their innermost block, beside text blocks.
pub const TEXT_ROOT_BLOCK_ELEMENTS: &str = "td th li dt dd figcaption caption details summary";

/// Attributes whose value is their own name when present.
///
/// [§ 2.3.2 Boolean attributes](https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#boolean-attributes)
pub const BOOL_ATTRIBUTES: &str = "checked compact declare defer disabled ismap multiple nohref \
     noresize noshade nowrap readonly selected autoplay loop controls allowfullscreen async \
     open reversed default muted playsinline required novalidate";

/// Elements padded when empty.
pub const PAD_EMPTY_ELEMENTS: &str = "p h1 h2 h3 h4 h5 h6 th td pre div address caption li summary";

/// Elements removed when empty.
pub const REMOVE_EMPTY_ELEMENTS: &str = "ol ul blockquote a table tbody";

/// Elements unwrapped when they carry no attributes.
pub const REMOVE_EMPTY_ATTRS_ELEMENTS: &str = "span";

/// Inline formatting elements padded inside an empty text-root block when
/// `padd_empty_block_inline_children` is on.
pub const INLINE_FORMAT_ELEMENTS: &str = "strong em b i u s sub sup span code mark small";

/// Structural parents that keep their child rules under custom rule sets.
pub const STRUCTURAL_ELEMENTS: &str = "html head body";

/// One row of the element table: names sharing attributes and a content model.
pub struct ElementSpec {
    /// Space-separated element names.
    pub names: &'static str,
    /// Space-separated element-specific attributes.
    pub attributes: &'static str,
    /// Space-separated allowed children; `%phrasing` and `%flow` expand.
    pub children: &'static str,
}

const fn spec(
    names: &'static str,
    attributes: &'static str,
    children: &'static str,
) -> ElementSpec {
    ElementSpec {
        names,
        attributes,
        children,
    }
}

/// The HTML5 element table.
pub const ELEMENTS: &[ElementSpec] = &[
    spec("html", "manifest", "head body"),
    spec("head", "", "title base link meta style script noscript"),
    spec("title", "", "#text"),
    spec("base", "href target", ""),
    spec("link", "href rel media hreflang type sizes crossorigin", ""),
    spec("meta", "name http-equiv content charset", ""),
    spec("style", "media type", "#text"),
    spec("script", "src async defer type charset crossorigin integrity", "#text"),
    spec("noscript", "", "%flow"),
    spec("body", "", "%flow"),
    spec("address dt dd div caption", "", "%flow"),
    spec(
        "h1 h2 h3 h4 h5 h6 pre p abbr code var samp kbd sub sup i b u bdo span legend em \
         strong small cite dfn s mark bdi summary",
        "",
        "%phrasing",
    ),
    spec("blockquote", "cite", "%flow"),
    spec("ol", "reversed start type", "li"),
    spec("ul", "", "li"),
    spec("li", "value", "%flow"),
    spec("dl", "", "dt dd"),
    spec(
        "a",
        "href target rel media hreflang type download name ping referrerpolicy",
        "%flow",
    ),
    spec("q", "cite", "%phrasing"),
    spec("ins del", "cite datetime", "%flow"),
    spec(
        "img",
        "src sizes srcset alt usemap ismap width height loading crossorigin referrerpolicy decoding",
        "",
    ),
    spec(
        "iframe",
        "src name width height srcdoc sandbox allow allowfullscreen loading referrerpolicy",
        "%flow",
    ),
    spec("embed", "src type width height", ""),
    spec("object", "data type typemustmatch name usemap form width height", "%flow param"),
    spec("param", "name value", ""),
    spec("map", "name", "%flow area"),
    spec(
        "area",
        "alt coords shape href target rel media hreflang type download ping referrerpolicy",
        "",
    ),
    spec("table", "border", "caption colgroup thead tfoot tbody tr"),
    spec("colgroup", "span", "col"),
    spec("col", "span", ""),
    spec("tbody thead tfoot", "", "tr"),
    spec("tr", "", "td th"),
    spec("td", "colspan rowspan headers", "%flow"),
    spec("th", "colspan rowspan headers scope abbr", "%flow"),
    spec(
        "form",
        "accept-charset action autocomplete enctype method name novalidate target",
        "%flow",
    ),
    spec("fieldset", "disabled form name", "%flow legend"),
    spec("label", "form for", "%phrasing"),
    spec(
        "input",
        "accept alt autocomplete checked dirname disabled form formaction formenctype \
         formmethod formnovalidate formtarget height list max maxlength min minlength multiple \
         name pattern placeholder readonly required size src step type value width",
        "",
    ),
    spec(
        "button",
        "disabled form formaction formenctype formmethod formnovalidate formtarget name type value",
        "%phrasing",
    ),
    spec(
        "select",
        "autocomplete disabled form multiple name required size",
        "option optgroup",
    ),
    spec("optgroup", "disabled label", "option"),
    spec("option", "disabled label selected value", "#text"),
    spec(
        "textarea",
        "cols dirname disabled form maxlength name placeholder readonly required rows wrap",
        "#text",
    ),
    spec("menu", "type label", "%flow li"),
    spec("hr br wbr", "", ""),
    spec("article section nav aside main header footer", "", "%flow"),
    spec("hgroup", "", "h1 h2 h3 h4 h5 h6"),
    spec("figure", "", "%flow figcaption"),
    spec("figcaption", "", "%flow"),
    spec("time", "datetime", "%phrasing"),
    spec("dialog", "open", "%flow"),
    spec("details", "open", "%flow summary"),
    spec(
        "video",
        "src crossorigin poster preload autoplay playsinline loop muted controls width height",
        "%flow source track",
    ),
    spec(
        "audio",
        "src crossorigin preload autoplay loop muted controls",
        "%flow source track",
    ),
    spec("picture", "", "img source"),
    spec("source", "src srcset type media sizes", ""),
    spec("track", "kind src srclang label default", ""),
    spec("datalist", "", "%phrasing option"),
    spec("data", "value", "%phrasing"),
    spec("output", "for form name", "%phrasing"),
    spec("canvas", "width height", "%flow"),
    spec("meter", "value min max low high optimum", "%phrasing"),
    spec("progress", "value max", "%phrasing"),
    spec("ruby", "", "%phrasing rt rp"),
    spec("rt rp", "", "%phrasing"),
];

/// Expand `%phrasing` / `%flow` in a child list into plain names.
pub fn expand_children(children: &str) -> impl Iterator<Item = &'static str> + '_ {
    children
        .split_whitespace()
        .flat_map(|token| -> Box<dyn Iterator<Item = &'static str>> {
            match token {
                "%phrasing" => Box::new(PHRASING_CONTENT.split_whitespace()),
                "%flow" => Box::new(
                    PHRASING_CONTENT
                        .split_whitespace()
                        .chain(BLOCK_CONTENT.split_whitespace()),
                ),
                _ => Box::new(std::iter::once(token).filter_map(static_name)),
            }
        })
}

/// Map a child token back to its `'static` spelling in the tables.
fn static_name(token: &str) -> Option<&'static str> {
    ELEMENTS
        .iter()
        .flat_map(|spec| spec.names.split_whitespace())
        .chain(["#text", "#comment"])
        .find(|name| *name == token)
}

//! Find-element scenarios over parsed fixtures

use tabnav_core::{
    FindOptions, FindOutput, Found, MoverProps, Modalizers, Navigator, NavigatorConfig,
    ParentMode, ScopeRegistry,
};
use tabnav_dom::{Document, NodeId};

struct Fixture {
    doc: Document,
    registry: ScopeRegistry,
}

impl Fixture {
    /// `body` becomes the content of a managed `<body>`
    fn new(body: &str) -> Self {
        let html = format!("<!DOCTYPE html><html><body data-tabnav-root>{body}</body></html>");
        let doc = tabnav_html::parse(&html).unwrap();
        let registry = ScopeRegistry::from_document(&doc).unwrap();
        Self { doc, registry }
    }

    fn id(&self, id: &str) -> NodeId {
        self.doc
            .get_element_by_id(id)
            .unwrap_or_else(|| panic!("no element #{id}"))
    }

    fn nav(&self) -> Navigator<'_> {
        Navigator::new(&self.doc, &self.registry)
    }

    fn names(&self, nodes: &[NodeId]) -> Vec<String> {
        nodes
            .iter()
            .map(|&n| self.doc.tree().attr(n, "id").unwrap_or("?").to_string())
            .collect()
    }

    fn name(&self, found: Found) -> Option<String> {
        found.element().map(|n| self.names(&[n]).remove(0))
    }
}

const ABC: &str = r#"<div id="c"><button id="a">A</button><button id="b">B</button><button id="x">C</button></div>"#;

#[test]
fn test_forward_without_reference_is_first() {
    let f = Fixture::new(ABC);
    let mut out = FindOutput::default();
    let found = f.nav().find_next(FindOptions::new(f.id("c")), &mut out);
    assert_eq!(f.name(found).as_deref(), Some("a"));
    assert!(out.out_of_dom_order);
}

#[test]
fn test_forward_and_backward_from_reference() {
    let f = Fixture::new(ABC);
    let nav = f.nav();
    let c = f.id("c");

    let mut out = FindOutput::default();
    let next = nav.find_next(FindOptions::new(c).current(f.id("a")), &mut out);
    assert_eq!(f.name(next).as_deref(), Some("b"));
    assert!(!out.out_of_dom_order);

    let prev = nav.find_prev(FindOptions::new(c).current(f.id("b")), &mut out);
    assert_eq!(f.name(prev).as_deref(), Some("a"));

    let none = nav.find_next(FindOptions::new(c).current(f.id("x")), &mut out);
    assert_eq!(none, Found::NotFound);
}

#[test]
fn test_first_last_all() {
    let f = Fixture::new(ABC);
    let nav = f.nav();
    let c = f.id("c");

    assert_eq!(f.name(nav.find_first(FindOptions::new(c))).as_deref(), Some("a"));
    assert_eq!(f.name(nav.find_last(FindOptions::new(c))).as_deref(), Some("x"));
    assert_eq!(f.names(&nav.find_all(FindOptions::new(c))), ["a", "b", "x"]);
    assert_eq!(
        f.names(&nav.find_all(FindOptions::new(c).backward(true))),
        ["x", "b", "a"]
    );
}

#[test]
fn test_missing_container() {
    let f = Fixture::new(ABC);
    assert_eq!(f.nav().find_first(FindOptions::default()), Found::NotFound);
    assert!(f.nav().find_all(FindOptions::default()).is_empty());
}

#[test]
fn test_unmanaged_dom_is_invisible() {
    let doc = tabnav_html::parse(ABC).unwrap();
    let registry = ScopeRegistry::new();
    let nav = Navigator::new(&doc, &registry);
    let c = doc.get_element_by_id("c").unwrap();
    assert_eq!(nav.find_first(FindOptions::new(c)), Found::NotFound);
}

#[test]
fn test_next_prev_round_trip() {
    let f = Fixture::new(
        r#"<div id="c">
            <button id="a">A</button>
            <x-host><template shadowrootmode="open"><button id="s1">1</button></template></x-host>
            <a id="link" href="/">link</a>
            <span><input id="i"></span>
        </div>"#,
    );
    let nav = f.nav();
    let c = f.id("c");
    let order = nav.find_all(FindOptions::new(c));
    assert_eq!(f.names(&order), ["a", "s1", "link", "i"]);

    let mut out = FindOutput::default();
    for pair in order.windows(2) {
        let next = nav.find_next(FindOptions::new(c).current(pair[0]), &mut out);
        assert_eq!(next, Found::Element(pair[1]));
        let back = nav.find_prev(FindOptions::new(c).current(pair[1]), &mut out);
        assert_eq!(back, Found::Element(pair[0]));
    }
}

#[test]
fn test_shadow_buttons_in_find_all() {
    let f = Fixture::new(
        r#"<div id="c">
            <x-host id="host">
                <template shadowrootmode="open">
                    <button id="s1">1</button><div><button id="s2">2</button></div>
                </template>
            </x-host>
            <button id="after">after</button>
        </div>"#,
    );
    let nav = f.nav();
    let c = f.id("c");
    assert_eq!(f.names(&nav.find_all(FindOptions::new(c))), ["s1", "s2", "after"]);
    assert_eq!(f.name(nav.find_last(FindOptions::new(f.id("host")))).as_deref(), Some("s2"));
}

#[test]
fn test_slotted_content_in_shadow_order() {
    let f = Fixture::new(
        r#"<div id="c">
            <x-card>
                <template shadowrootmode="open">
                    <button id="head">head</button>
                    <div><slot name="body"></slot></div>
                    <button id="foot">foot</button>
                </template>
                <button id="slotted" slot="body">slotted</button>
                <button id="unslotted">unslotted</button>
            </x-card>
        </div>"#,
    );
    let nav = f.nav();
    assert_eq!(
        f.names(&nav.find_all(FindOptions::new(f.id("c")))),
        ["head", "slotted", "foot"]
    );
}

#[test]
fn test_delegating_host_is_stepped_through() {
    let f = Fixture::new(
        r#"<div id="c">
            <x-field id="field" tabindex="-1">
                <template shadowrootmode="open" shadowrootdelegatesfocus>
                    <input id="inner">
                </template>
            </x-field>
        </div>"#,
    );
    let found = f.nav().find_first(FindOptions::new(f.id("c")));
    assert_eq!(f.name(found).as_deref(), Some("inner"));
}

#[test]
fn test_aria_hidden_is_skipped_out_of_order() {
    let f = Fixture::new(
        r#"<div id="c">
            <button id="a">A</button>
            <div aria-hidden="true"><button id="hidden">H</button></div>
            <button id="b">B</button>
        </div>"#,
    );
    let nav = f.nav();
    assert!(!nav.is_focusable(f.id("hidden"), false, false, false));

    let mut out = FindOutput::default();
    let next = nav.find_next(FindOptions::new(f.id("c")).current(f.id("a")), &mut out);
    assert_eq!(f.name(next).as_deref(), Some("b"));
    assert!(out.out_of_dom_order);

    let mut out = FindOutput::default();
    let next = nav.find_next(
        FindOptions::new(f.id("c")).current(f.id("a")).ignore_accessibility(true),
        &mut out,
    );
    assert_eq!(f.name(next).as_deref(), Some("hidden"));
}

#[test]
fn test_uncontrolled_region() {
    let with_after = Fixture::new(
        r#"<div id="c">
            <button id="a">A</button>
            <div id="u" data-tabnav-uncontrolled><button id="inside">U</button></div>
            <button id="b">B</button>
        </div>"#,
    );
    let nav = with_after.nav();
    let mut met = Vec::new();
    let mut out = FindOutput::default();
    let found = nav.find_next(
        FindOptions::new(with_after.id("c"))
            .current(with_after.id("a"))
            .on_uncontrolled(|region| met.push(region)),
        &mut out,
    );
    assert_eq!(found, Found::DefaultAction);
    assert!(found.is_default_action());
    assert_eq!(found.element(), None);
    assert_eq!(met, vec![with_after.id("u")]);

    let without_after = Fixture::new(
        r#"<div id="c">
            <button id="a">A</button>
            <div data-tabnav-uncontrolled><button>U</button></div>
        </div>"#,
    );
    let found = without_after.nav().find_next(
        FindOptions::new(without_after.id("c")).current(without_after.id("a")),
        &mut FindOutput::default(),
    );
    assert_eq!(found, Found::NotFound);

    // find_all ignores the region instead of stopping at it
    assert_eq!(
        with_after.names(&with_after.nav().find_all(FindOptions::new(with_after.id("c")))),
        ["a", "b"]
    );
}

#[test]
fn test_ignore_focus_with_ignore_uncontrolled() {
    let f = Fixture::new(
        r#"<div id="c">
            <button id="a">A</button>
            <div data-tabnav-uncontrolled><button id="inside">U</button></div>
            <button id="skipped" data-tabnav='{"ignoreFocus": true}'>S</button>
            <button id="b">B</button>
        </div>"#,
    );
    let all = f.nav().find_all(FindOptions::new(f.id("c")).ignore_uncontrolled(true));
    assert_eq!(f.names(&all), ["a", "inside", "b"]);
}

#[test]
fn test_limited_groupper_is_one_stop() {
    let f = Fixture::new(
        r#"<div id="c">
            <button id="before">before</button>
            <div id="g" tabindex="0" data-tabnav='{"groupper": {"tabbability": "limited"}}'>
                <button id="g1">1</button><button id="g2">2</button>
            </div>
            <button id="after">after</button>
        </div>"#,
    );
    let nav = f.nav();
    let c = f.id("c");

    assert_eq!(f.names(&nav.find_all(FindOptions::new(c))), ["before", "g", "after"]);

    let mut out = FindOutput::default();
    let inside = nav.find_next(FindOptions::new(c).current(f.id("g1")), &mut out);
    assert_eq!(f.name(inside).as_deref(), Some("g2"));

    let back = nav.find_prev(FindOptions::new(c).current(f.id("after")), &mut out);
    assert_eq!(f.name(back).as_deref(), Some("g"));
}

#[test]
fn test_limited_groupper_without_focusable_element() {
    let f = Fixture::new(
        r#"<div id="c">
            <button id="before">before</button>
            <div id="g" data-tabnav='{"groupper": {"tabbability": "limited"}}'>
                <button id="g1">1</button><button id="g2">2</button>
            </div>
            <button id="after">after</button>
        </div>"#,
    );
    let nav = f.nav();
    let c = f.id("c");

    let mut out = FindOutput::default();
    let next = nav.find_next(FindOptions::new(c).current(f.id("before")), &mut out);
    assert_eq!(f.name(next).as_deref(), Some("g1"));
    assert!(out.out_of_dom_order);

    let next = nav.find_next(FindOptions::new(c).current(f.id("g2")), &mut out);
    assert_eq!(f.name(next).as_deref(), Some("after"));
}

#[test]
fn test_unlimited_groupper_is_transparent() {
    let f = Fixture::new(
        r#"<div id="c">
            <div data-tabnav='{"groupper": {}}'><button id="g1">1</button><button id="g2">2</button></div>
        </div>"#,
    );
    assert_eq!(f.names(&f.nav().find_all(FindOptions::new(f.id("c")))), ["g1", "g2"]);
}

const MOVER: &str = r#"<div id="c">
    <button id="before">before</button>
    <div id="m" data-tabnav='{"mover": {"memorizeCurrent": true}}'>
        <button id="m1">1</button><button id="m2" data-tabnav-default>2</button><button id="m3">3</button>
    </div>
    <button id="after">after</button>
</div>"#;

#[test]
fn test_mover_enters_on_default() {
    let f = Fixture::new(MOVER);
    let nav = f.nav();
    let c = f.id("c");
    let mut out = FindOutput::default();

    let entered = nav.find_next(FindOptions::new(c).current(f.id("before")), &mut out);
    assert_eq!(f.name(entered).as_deref(), Some("m2"));

    let entered = nav.find_prev(FindOptions::new(c).current(f.id("after")), &mut out);
    assert_eq!(f.name(entered).as_deref(), Some("m2"));

    // Tab leaves a non-tabbable mover
    let left = nav.find_next(FindOptions::new(c).current(f.id("m1")), &mut out);
    assert_eq!(f.name(left).as_deref(), Some("after"));
}

#[test]
fn test_mover_memorized_item() {
    let mut f = Fixture::new(MOVER);
    let m3 = f.id("m3");
    f.registry.memorize(&f.doc, m3, ParentMode::Composed);

    let mut out = FindOutput::default();
    let entered = f
        .nav()
        .find_next(FindOptions::new(f.id("c")).current(f.id("before")), &mut out);
    assert_eq!(entered, Found::Element(m3));
}

#[test]
fn test_tabbable_mover_walks_items() {
    let mut f = Fixture::new(MOVER);
    let m = f.id("m");
    f.registry.add_mover(
        m,
        MoverProps {
            tabbable: true,
            ..MoverProps::default()
        },
    );

    let mut out = FindOutput::default();
    let next = f
        .nav()
        .find_next(FindOptions::new(f.id("c")).current(f.id("m1")), &mut out);
    assert_eq!(f.name(next).as_deref(), Some("m2"));
}

#[test]
fn test_limited_groupper_as_container_lists_items() {
    let f = Fixture::new(
        r#"<div id="c">
            <div id="g" tabindex="0" data-tabnav='{"groupper": {"tabbability": "limited"}}'>
                <button id="g1">1</button><button id="g2">2</button>
            </div>
        </div>"#,
    );
    let nav = f.nav();
    let g = f.id("g");

    assert_eq!(f.names(&nav.find_all(FindOptions::new(g))), ["g1", "g2"]);

    let mut out = FindOutput::default();
    let next = nav.find_next(FindOptions::new(g).current(f.id("g1")), &mut out);
    assert_eq!(f.name(next).as_deref(), Some("g2"));
}

#[test]
fn test_mover_inside_unlimited_groupper() {
    let f = Fixture::new(
        r#"<div id="c">
            <button id="before">before</button>
            <div id="g" data-tabnav='{"groupper": {}}'>
                <div id="m" data-tabnav='{"mover": {}}'>
                    <button id="m1">1</button><button id="m2" data-tabnav-default>2</button><button id="m3">3</button>
                </div>
                <button id="g2">g2</button>
            </div>
            <button id="after">after</button>
        </div>"#,
    );
    let nav = f.nav();
    let c = f.id("c");
    let mut out = FindOutput::default();

    // The mover is the inner scope, so it decides the entry point
    let entered = nav.find_next(FindOptions::new(c).current(f.id("before")), &mut out);
    assert_eq!(f.name(entered).as_deref(), Some("m2"));

    let left = nav.find_next(FindOptions::new(c).current(f.id("m1")), &mut out);
    assert_eq!(f.name(left).as_deref(), Some("g2"));
}

#[test]
fn test_outer_mover_of_reference_governs_inner_mover() {
    let f = Fixture::new(
        r#"<div id="c">
            <div id="o" data-tabnav='{"mover": {}}'>
                <button id="o1">o1</button>
                <div id="i" data-tabnav='{"mover": {}}'>
                    <button id="i1">i1</button><button id="i2">i2</button>
                </div>
            </div>
            <button id="after">after</button>
        </div>"#,
    );
    let nav = f.nav();
    let mut out = FindOutput::default();

    let next = nav.find_next(FindOptions::new(f.id("c")).current(f.id("o1")), &mut out);
    assert_eq!(f.name(next).as_deref(), Some("after"));
    assert!(out.out_of_dom_order);
}

const MODALS: &str = r#"<div id="c">
    <div id="main" data-tabnav='{"modalizer": {"id": "main"}}'><button id="x">x</button></div>
    <div id="dialog" data-tabnav='{"modalizer": {"id": "dialog"}}'><button id="y">y</button></div>
    <iframe id="frame"></iframe>
</div>"#;

#[test]
fn test_active_modalizer_restricts_search() {
    let f = Fixture::new(MODALS);
    let mut modalizers = Modalizers::new();
    modalizers.activate("dialog");
    let nav = f.nav().with_modalizer(&modalizers);
    let c = f.id("c");

    let all = nav.find_all(FindOptions::new(c).use_active_modalizer(true));
    assert_eq!(f.names(&all), ["y"]);

    let all = nav.find_all(FindOptions::new(c).modalizer("main"));
    assert_eq!(f.names(&all), ["x"]);
}

#[test]
fn test_modal_content_needs_modal_id() {
    let mut f = Fixture::new(MODALS);
    let modalizers = Modalizers::new();
    let nav = f.nav().with_modalizer(&modalizers);
    // Only the iframe sits outside every modal
    assert_eq!(f.names(&nav.find_all(FindOptions::new(f.id("c")))), ["frame"]);

    let main = f.id("main");
    f.registry.update(main, |config| {
        if let Some(modalizer) = config.modalizer.as_mut() {
            modalizer.is_always_accessible = true;
        }
    });
    let nav = f.nav().with_modalizer(&modalizers);
    assert_eq!(f.names(&nav.find_all(FindOptions::new(f.id("c")))), ["x", "frame"]);
}

#[test]
fn test_modal_scoping_needs_a_policy() {
    let f = Fixture::new(MODALS);
    assert_eq!(
        f.names(&f.nav().find_all(FindOptions::new(f.id("c")))),
        ["x", "y", "frame"]
    );
}

#[test]
fn test_iframe_outside_active_modal_is_rejected() {
    let f = Fixture::new(MODALS);
    let mut modalizers = Modalizers::new();
    modalizers.activate("dialog");
    let nav = f.nav().with_modalizer(&modalizers);
    let found = nav.find_last(FindOptions::new(f.id("c")).use_active_modalizer(true));
    assert_eq!(f.name(found).as_deref(), Some("y"));
}

#[test]
fn test_dummy_sentinels_are_invisible() {
    let mut f = Fixture::new(
        r#"<div id="c"><input id="dummy" tabindex="0"><button id="a">A</button></div>"#,
    );
    let dummy = f.id("dummy");
    f.registry.mark_dummy(dummy);

    let nav = f.nav();
    let c = f.id("c");
    assert_eq!(f.names(&nav.find_all(FindOptions::new(c))), ["a"]);

    let mut walker = nav.create_element_walker(c, tabnav_core::AcceptAllFilter);
    assert_eq!(walker.next_node(), Some(f.id("a")));
}

#[test]
fn test_find_default() {
    let f = Fixture::new(
        r#"<div id="c"><button id="a">A</button><button id="d" data-tabnav-default>D</button></div>"#,
    );
    let nav = f.nav();
    assert_eq!(nav.find_default(FindOptions::new(f.id("c"))), Some(f.id("d")));
    assert!(nav.props(f.id("d")).is_default);
    assert_eq!(nav.find_default(FindOptions::new(f.id("a"))), None);
}

#[test]
fn test_custom_accept_condition() {
    let f = Fixture::new(ABC);
    let b = f.id("b");
    let found = f.nav().find_first(FindOptions::new(f.id("c")).accept(|n| n == b));
    assert_eq!(found, Found::Element(b));
}

#[test]
fn test_on_element_stops_enumeration() {
    let f = Fixture::new(ABC);
    let mut seen = Vec::new();
    let all = f.nav().find_all(FindOptions::new(f.id("c")).on_element(|e| {
        seen.push(e);
        seen.len() < 2
    }));
    assert_eq!(f.names(&all), ["a", "b"]);
    assert_eq!(seen.len(), 2);
}

#[test]
fn test_programmatic_focus() {
    let f = Fixture::new(r#"<div id="c"><div id="p" tabindex="-1">p</div><button id="a">A</button></div>"#);
    let nav = f.nav();
    let c = f.id("c");
    assert_eq!(f.names(&nav.find_all(FindOptions::new(c))), ["a"]);
    assert_eq!(f.names(&nav.find_all(FindOptions::new(c).programmatic(true))), ["p", "a"]);
}

#[test]
fn test_light_parent_mode_stays_out_of_shadow() {
    let f = Fixture::new(
        r#"<div id="c">
            <x-host><template shadowrootmode="open"><button id="s1">1</button></template></x-host>
            <button id="after">after</button>
        </div>"#,
    );
    let config = NavigatorConfig {
        parent_mode: ParentMode::Light,
        ..Default::default()
    };
    let nav = f.nav().with_config(config);
    assert_eq!(f.names(&nav.find_all(FindOptions::new(f.id("c")))), ["after"]);
}

#[test]
fn test_invisible_candidates_are_skipped() {
    let f = Fixture::new(
        r#"<div id="c">
            <button id="gone" style="display: none">gone</button>
            <div style="visibility: hidden"><button id="ghost">ghost</button></div>
            <button id="a">A</button>
        </div>"#,
    );
    let mut out = FindOutput::default();
    let first = f.nav().find_next(FindOptions::new(f.id("c")), &mut out);
    assert_eq!(f.name(first).as_deref(), Some("a"));

    let config = NavigatorConfig {
        check_visibility: false,
        ..Default::default()
    };
    let first = f.nav().with_config(config).find_first(FindOptions::new(f.id("c")));
    assert_eq!(f.name(first).as_deref(), Some("gone"));
}

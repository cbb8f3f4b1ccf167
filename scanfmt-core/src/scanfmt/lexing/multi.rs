//! Multi-syntax composition
//!
//!     A `MultiSyntax` runs a master syntax over the text and hands delimited regions to
//!     child syntaxes, e.g. Java code between `<%` and `%>` inside an HTML page. Consumers
//!     see one flat id space:
//!
//!         0                      EOL
//!         1 ..= m                master ids, never shifted
//!         m + 1, m + 2           region open / region close delimiters
//!         s1 + 1 ..= s1 + h1     first child, shifted by s1 = m + 3
//!         s2 + 1 ..= s2 + h2     second child, s2 = s1 + h1 + 1
//!
//!     Shifts are handed out at registration and fixed from the first time the composite
//!     names or produces a token.
//!
//! Cutting Master Tokens
//!
//!     The master knows nothing about regions, so one of its tokens may run straight into
//!     an opening delimiter (think of a quoted HTML value containing `<%= x %>`). The
//!     composite first runs the master with the window stopped at the delimiter. If the
//!     master cannot finish its token there, the composite remembers the master's state at
//!     the cut, rescans the token from its start as if the text ended at the delimiter, and
//!     then puts the remembered state back. After the region closes the master continues
//!     exactly where the cut left it.
//!
//!     The rescan needs the master's state at the start of the pending token, which is why
//!     the mark stores it next to the master's current state.
//!
//! Marks
//!
//!     A composite mark holds the master's state plus one sub-mark per child, keyed by the
//!     child's name. Sub-marks of inactive children are kept but flagged invalid, so a child
//!     that becomes active again reuses its slot. Only one child can be active at a time and
//!     two children with the same name share one slot.

use super::buffer::{PatternMatch, ScanBuffer};
use super::common::{mismatch, MarkCompare, ScanError, Syntax, SyntaxState};
use super::html::HtmlSyntax;
use super::java::JavaSyntax;
use crate::scanfmt::token::{TokenId, TokenKind};
use std::borrow::Cow;
use std::cell::Cell;
use std::fmt;
use tracing::{debug, warn};

/// Opening and closing delimiter of a child region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    open: Vec<char>,
    close: Vec<char>,
}

impl Region {
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.chars().collect(),
            close: close.chars().collect(),
        }
    }

    pub fn open(&self) -> String {
        self.open.iter().collect()
    }

    pub fn close(&self) -> String {
        self.close.iter().collect()
    }
}

struct Child {
    syntax: Box<dyn Syntax>,
    shift: u32,
    region: Region,
}

/// Stored state of one child inside a [`MultiMark`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildMark {
    name: &'static str,
    state: SyntaxState,
    valid: bool,
}

/// Stored state of a [`MultiSyntax`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiMark {
    master: SyntaxState,
    master_start: SyntaxState,
    active: Option<&'static str>,
    children: Vec<ChildMark>,
}

impl MultiMark {
    /// Name of the child that was scanning when the mark was taken.
    pub fn active(&self) -> Option<&'static str> {
        self.active
    }

    /// Sub-mark of `name`, if one is stored and valid.
    pub fn child_state(&self, name: &str) -> Option<&SyntaxState> {
        self.children
            .iter()
            .find(|c| c.name == name && c.valid)
            .map(|c| &c.state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DelimiterHit {
    /// Absolute position.
    at: usize,
    child: usize,
    full: bool,
}

#[derive(Debug, Clone, Copy)]
struct SearchCache {
    active: Option<usize>,
    from: usize,
    stop: usize,
    last: bool,
    hit: Option<DelimiterHit>,
}

/// A master syntax with delimited child regions.
pub struct MultiSyntax {
    name: &'static str,
    master: Box<dyn Syntax>,
    children: Vec<Child>,
    active: Option<usize>,
    /// Master state at the start of the pending master token.
    master_start: SyntaxState,
    /// Renamed ids, sorted by id.
    names: Vec<(TokenId, String)>,
    sealed: Cell<bool>,
    cache: Option<SearchCache>,
}

impl fmt::Debug for MultiSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiSyntax")
            .field("name", &self.name)
            .field("master", &self.master.name())
            .field(
                "children",
                &self
                    .children
                    .iter()
                    .map(|c| (c.syntax.name(), c.shift))
                    .collect::<Vec<_>>(),
            )
            .field("active", &self.active)
            .finish()
    }
}

impl MultiSyntax {
    pub fn new<S: Syntax + 'static>(name: &'static str, master: S) -> Self {
        let master_start = master.store_state();
        Self {
            name,
            master: Box::new(master),
            children: Vec::new(),
            active: None,
            master_start,
            names: Vec::new(),
            sealed: Cell::new(false),
            cache: None,
        }
    }

    /// HTML with Java between `<%` and `%>`.
    pub fn jsp() -> Self {
        let mut multi = MultiSyntax::new("jsp", HtmlSyntax::new());
        // A fresh composite is never sealed and the delimiters are not empty.
        if let Err(err) = multi.register(JavaSyntax::new(), Region::new("<%", "%>")) {
            warn!(%err, "failed to register the java region");
        }
        multi
    }

    /// Id of the token covering an opening delimiter. The helper is the child index.
    pub fn region_open_id(&self) -> TokenId {
        TokenId(self.master.highest_token_id() + 1)
    }

    /// Id of the token covering a closing delimiter. The helper is the child index.
    pub fn region_close_id(&self) -> TokenId {
        TokenId(self.master.highest_token_id() + 2)
    }

    fn own_highest(&self) -> u32 {
        self.master.highest_token_id() + 2
    }

    /// Adds a child and returns the shift applied to its ids.
    pub fn register<S: Syntax + 'static>(
        &mut self,
        child: S,
        region: Region,
    ) -> Result<u32, ScanError> {
        if self.sealed.get() {
            return Err(ScanError::RegistrationClosed(child.name()));
        }
        if region.open.is_empty() || region.close.is_empty() {
            return Err(ScanError::EmptyDelimiter(child.name()));
        }
        let shift = match self.children.last() {
            Some(prev) => prev.shift + prev.syntax.highest_token_id() + 1,
            None => self.own_highest() + 1,
        };
        self.children.push(Child {
            syntax: Box::new(child),
            shift,
            region,
        });
        Ok(shift)
    }

    /// Shift of the child called `name`.
    pub fn shift_of(&self, name: &str) -> Option<u32> {
        self.children
            .iter()
            .find(|c| c.syntax.name() == name)
            .map(|c| c.shift)
    }

    /// Overrides the name reported for `id`.
    pub fn change_token_name(&mut self, id: TokenId, name: impl Into<String>) {
        let name = name.into();
        match self.names.binary_search_by_key(&id, |(id, _)| *id) {
            Ok(pos) => self.names[pos].1 = name,
            Err(pos) => self.names.insert(pos, (id, name)),
        }
    }

    /// Name of the child scanning right now.
    pub fn active_child(&self) -> Option<&'static str> {
        self.active.map(|i| self.children[i].syntax.name())
    }

    fn restore_master(&mut self, state: &SyntaxState) {
        if let Err(err) = self.master.load_state(Some(state)) {
            warn!(%err, "master rejected its own state");
        }
    }

    fn find_delimiter(&mut self, buf: &ScanBuffer) -> Option<DelimiterHit> {
        let from = buf.position();
        let stop = buf.absolute(buf.stop);
        if let Some(cache) = self.cache {
            if cache.active == self.active
                && cache.stop == stop
                && cache.last == buf.last
                && cache.from <= from
                && cache.hit.map_or(true, |hit| hit.at >= from)
            {
                return cache.hit;
            }
        }

        let hit = self.search(buf);
        self.cache = Some(SearchCache {
            active: self.active,
            from,
            stop,
            last: buf.last,
            hit,
        });
        hit
    }

    fn search(&self, buf: &ScanBuffer) -> Option<DelimiterHit> {
        let patterns: Vec<(usize, &[char])> = match self.active {
            Some(active) => vec![(active, self.children[active].region.close.as_slice())],
            None => self
                .children
                .iter()
                .enumerate()
                .map(|(i, c)| (i, c.region.open.as_slice()))
                .collect(),
        };
        for index in buf.offset..buf.stop {
            for &(child, pattern) in &patterns {
                let full = match buf.match_at(index, pattern) {
                    PatternMatch::Full => true,
                    PatternMatch::Partial if !buf.last => false,
                    _ => continue,
                };
                return Some(DelimiterHit {
                    at: buf.absolute(index),
                    child,
                    full,
                });
            }
        }
        None
    }

    /// Runs the master, skipping empty tokens it may report when resumed mid-token.
    fn run_master(&mut self, buf: &mut ScanBuffer) -> Option<TokenKind> {
        loop {
            let found = self.master.parse_token(buf)?;
            self.master_start = self.master.store_state();
            if buf.token_len() > 0 {
                return Some(found);
            }
        }
    }

    fn parse_master(&mut self, buf: &mut ScanBuffer) -> Option<TokenKind> {
        let Some(hit) = self.find_delimiter(buf) else {
            return self.run_master(buf);
        };
        let at = hit.at - buf.start_pos;
        if hit.full && at == buf.offset && buf.token_len() == 0 {
            return Some(self.open_region(buf, hit.child));
        }

        let (stop, last) = (buf.stop, buf.last);
        buf.stop = at;
        buf.last = false;
        let found = self.run_master(buf);
        buf.stop = stop;
        buf.last = last;

        if found.is_some() || !hit.full {
            return found;
        }
        self.cut_master(buf, at)
    }

    /// Emits the pending master token as it stands at an opening delimiter.
    fn cut_master(&mut self, buf: &mut ScanBuffer, at: usize) -> Option<TokenKind> {
        let cut_state = self.master.store_state();
        let start = self.master_start.clone();
        self.restore_master(&start);
        buf.offset = buf.token_offset;

        let (stop, last) = (buf.stop, buf.last);
        buf.stop = at;
        buf.last = true;
        let found = self.master.parse_token(buf);
        buf.stop = stop;
        buf.last = last;

        if buf.offset == at {
            self.restore_master(&cut_state);
        }
        self.master_start = self.master.store_state();
        found
    }

    fn open_region(&mut self, buf: &mut ScanBuffer, index: usize) -> TokenKind {
        let child = &mut self.children[index];
        for _ in 0..child.region.open.len() {
            buf.advance();
        }
        if let Err(err) = child.syntax.load_state(None) {
            warn!(%err, child = child.syntax.name(), "child failed to reset");
        }
        debug!(
            child = child.syntax.name(),
            at = buf.token_position(),
            "region opened"
        );
        self.active = Some(index);
        TokenKind::with_helper(self.region_open_id(), index as u16)
    }

    fn close_region(&mut self, buf: &mut ScanBuffer, index: usize) -> TokenKind {
        let child = &self.children[index];
        for _ in 0..child.region.close.len() {
            buf.advance();
        }
        debug!(
            child = child.syntax.name(),
            at = buf.token_position(),
            "region closed"
        );
        self.active = None;
        self.master_start = self.master.store_state();
        TokenKind::with_helper(self.region_close_id(), index as u16)
    }

    fn parse_child(&mut self, buf: &mut ScanBuffer, index: usize) -> Option<TokenKind> {
        let hit = self.find_delimiter(buf);
        let shift = self.children[index].shift;
        let shifted = |kind: TokenKind| TokenKind {
            id: kind.id.shifted(shift),
            helper: kind.helper,
        };

        let Some(hit) = hit else {
            return self.children[index].syntax.parse_token(buf).map(shifted);
        };
        let at = hit.at - buf.start_pos;
        if hit.full && at == buf.offset && buf.token_len() == 0 {
            return Some(self.close_region(buf, index));
        }

        // The region ends at a full delimiter, so the child sees it as the end of its text.
        let (stop, last) = (buf.stop, buf.last);
        buf.stop = at;
        buf.last = hit.full;
        let found = self.children[index].syntax.parse_token(buf);
        buf.stop = stop;
        buf.last = last;

        match found {
            Some(kind) => Some(shifted(kind)),
            None if hit.full && buf.offset == at && buf.token_len() == 0 => {
                Some(self.close_region(buf, index))
            }
            None => None,
        }
    }

    fn child_for(&self, id: TokenId) -> Option<&Child> {
        self.children
            .iter()
            .find(|c| id.0 > c.shift && id.0 <= c.shift + c.syntax.highest_token_id())
    }
}

impl Syntax for MultiSyntax {
    fn name(&self) -> &'static str {
        self.name
    }

    fn highest_token_id(&self) -> u32 {
        self.sealed.set(true);
        match self.children.last() {
            Some(last) => last.shift + last.syntax.highest_token_id(),
            None => self.own_highest(),
        }
    }

    fn token_name(&self, id: TokenId) -> Option<Cow<'static, str>> {
        self.sealed.set(true);
        if let Ok(pos) = self.names.binary_search_by_key(&id, |(id, _)| *id) {
            return Some(Cow::Owned(self.names[pos].1.clone()));
        }
        if id.is_eol() {
            return None;
        }
        if let Some(child) = self.child_for(id) {
            return child.syntax.token_name(TokenId(id.0 - child.shift));
        }
        if id == self.region_open_id() {
            return Some(Cow::Borrowed("RegionOpen"));
        }
        if id == self.region_close_id() {
            return Some(Cow::Borrowed("RegionClose"));
        }
        self.master.token_name(id)
    }

    fn parse_token(&mut self, buf: &mut ScanBuffer) -> Option<TokenKind> {
        self.sealed.set(true);
        match self.active {
            None => self.parse_master(buf),
            Some(index) => self.parse_child(buf, index),
        }
    }

    fn store_state(&self) -> SyntaxState {
        let mut state = SyntaxState::Custom(0);
        self.store_state_into(&mut state);
        state
    }

    fn store_state_into(&self, target: &mut SyntaxState) {
        if !matches!(target, SyntaxState::Multi(_)) {
            *target = SyntaxState::Multi(Box::new(MultiMark {
                master: self.master.store_state(),
                master_start: self.master_start.clone(),
                active: None,
                children: Vec::new(),
            }));
        }
        let SyntaxState::Multi(mark) = target else {
            return;
        };

        self.master.store_state_into(&mut mark.master);
        mark.master_start.clone_from(&self.master_start);
        mark.active = self.active_child();
        for sub in mark.children.iter_mut() {
            sub.valid = false;
        }
        if let Some(index) = self.active {
            let child = &self.children[index];
            let name = child.syntax.name();
            match mark.children.iter_mut().find(|c| c.name == name) {
                Some(sub) => {
                    child.syntax.store_state_into(&mut sub.state);
                    sub.valid = true;
                }
                None => mark.children.push(ChildMark {
                    name,
                    state: child.syntax.store_state(),
                    valid: true,
                }),
            }
        }
    }

    fn load_state(&mut self, state: Option<&SyntaxState>) -> Result<(), ScanError> {
        self.cache = None;
        let mark = match state {
            None => {
                self.master.load_state(None)?;
                for child in self.children.iter_mut() {
                    child.syntax.load_state(None)?;
                }
                self.active = None;
                self.master_start = self.master.store_state();
                return Ok(());
            }
            Some(SyntaxState::Multi(mark)) => mark,
            Some(other) => return Err(mismatch(self.name, other)),
        };

        self.master.load_state(Some(&mark.master))?;
        self.master_start = mark.master_start.clone();
        self.active = None;
        if let Some(name) = mark.active {
            let index = self
                .children
                .iter()
                .position(|c| c.syntax.name() == name)
                .ok_or(ScanError::MissingSubMark(name))?;
            let sub = mark.child_state(name).ok_or(ScanError::MissingSubMark(name))?;
            self.children[index].syntax.load_state(Some(sub))?;
            self.active = Some(index);
        }
        Ok(())
    }

    fn compare_state(&self, state: &SyntaxState) -> MarkCompare {
        let SyntaxState::Multi(mark) = state else {
            return MarkCompare::Different;
        };
        if !self.master.compare_state(&mark.master).is_equal()
            || self.master_start != mark.master_start
            || self.active_child() != mark.active
        {
            return MarkCompare::Different;
        }
        match self.active {
            None => MarkCompare::Equal,
            Some(index) => {
                let child = &self.children[index];
                match mark.child_state(child.syntax.name()) {
                    Some(sub) => child.syntax.compare_state(sub),
                    None => MarkCompare::Different,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanfmt::lexing::html::HtmlTokenId;
    use crate::scanfmt::lexing::java::JavaTokenId;
    use crate::scanfmt::testing::{render_tokens, tokenize};
    use crate::scanfmt::token::detokenize;
    use insta::assert_snapshot;

    #[test]
    fn test_jsp_ids() {
        let jsp = MultiSyntax::jsp();
        assert_eq!(jsp.region_open_id(), TokenId(HtmlTokenId::HIGHEST + 1));
        assert_eq!(jsp.region_close_id(), TokenId(HtmlTokenId::HIGHEST + 2));
        assert_eq!(jsp.shift_of("java"), Some(HtmlTokenId::HIGHEST + 3));
        assert_eq!(
            jsp.highest_token_id(),
            HtmlTokenId::HIGHEST + 3 + JavaTokenId::HIGHEST
        );
    }

    #[test]
    fn test_jsp_tokens() {
        assert_snapshot!(
            render_tokens(MultiSyntax::jsp(), "<p><% int x; %></p>"),
            @"Tag(<p) TagClose(>) RegionOpen(<%) Whitespace( ) Keyword(int) Whitespace( ) Identifier(x) Operator(;) Whitespace( ) RegionClose(%>) Tag(</p) TagClose(>)"
        );
    }

    #[test]
    fn test_child_ids_are_shifted() {
        let tokens = tokenize(MultiSyntax::jsp(), "<%x%>");
        let shift = HtmlTokenId::HIGHEST + 3;
        assert_eq!(tokens[1].0.id, JavaTokenId::Identifier.id().shifted(shift));
        assert_eq!(tokens[1].1, "x");
    }

    #[test]
    fn test_master_token_cut_at_delimiter_resumes_after_region() {
        assert_snapshot!(
            render_tokens(MultiSyntax::jsp(), "<a href=\"x<%=y%>z\">"),
            @r#"Tag(<a) Ws( ) Argument(href) Operator(=) Value("x) RegionOpen(<%) Operator(=) Identifier(y) RegionClose(%>) Value(z") TagClose(>)"#
        );
    }

    #[test]
    fn test_sgml_comment_dash_split_by_region() {
        let text = "<!DOCTYPE -<%x%>-->";
        assert_snapshot!(
            render_tokens(MultiSyntax::jsp(), text),
            @"Declaration(<!DOCTYPE -) RegionOpen(<%) Identifier(x) RegionClose(%>) SgmlComment(-->)"
        );
        assert_eq!(detokenize(&tokenize(MultiSyntax::jsp(), text)), text);
    }

    #[test]
    fn test_unclosed_region_runs_to_end() {
        let tokens = tokenize(MultiSyntax::jsp(), "a<% b");
        let texts: Vec<&str> = tokens.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["a", "<%", " ", "b"]);
    }

    #[test]
    fn test_register_after_use_is_rejected() {
        let mut jsp = MultiSyntax::jsp();
        let _ = jsp.token_name(TokenId(1));
        let result = jsp.register(JavaSyntax::new(), Region::new("<?", "?>"));
        assert_eq!(result, Err(ScanError::RegistrationClosed("java")));
    }

    #[test]
    fn test_empty_delimiter_is_rejected() {
        let mut multi = MultiSyntax::new("x", HtmlSyntax::new());
        let result = multi.register(JavaSyntax::new(), Region::new("", "%>"));
        assert_eq!(result, Err(ScanError::EmptyDelimiter("java")));
    }

    #[test]
    fn test_token_name_overrides_win() {
        let mut jsp = MultiSyntax::jsp();
        let shift = jsp.shift_of("java").unwrap_or_default();
        let keyword = JavaTokenId::Keyword.id().shifted(shift);
        jsp.change_token_name(keyword, "JavaKeyword");
        jsp.change_token_name(TokenId(1), "Body");
        assert_eq!(jsp.token_name(keyword).as_deref(), Some("JavaKeyword"));
        assert_eq!(jsp.token_name(TokenId(1)).as_deref(), Some("Body"));
        assert_eq!(
            jsp.token_name(JavaTokenId::Operator.id().shifted(shift)).as_deref(),
            Some("Operator")
        );
        assert_eq!(jsp.token_name(TokenId(4)).as_deref(), Some("Tag"));
    }

    #[test]
    fn test_inactive_child_sub_mark_is_kept_but_invalid() {
        let mut jsp = MultiSyntax::jsp();
        let mut buf = ScanBuffer::new();
        buf.load("<%x%>".chars().collect(), 0, 0, true);

        let mut state = SyntaxState::Custom(0);
        jsp.parse_token(&mut buf);
        buf.finish_token();
        jsp.store_state_into(&mut state);
        assert!(matches!(&state, SyntaxState::Multi(m) if m.active() == Some("java")));

        while jsp.parse_token(&mut buf).is_some() {
            buf.finish_token();
        }
        jsp.store_state_into(&mut state);
        let SyntaxState::Multi(mark) = &state else {
            panic!("expected a multi mark");
        };
        assert_eq!(mark.active(), None);
        assert_eq!(mark.children.len(), 1);
        assert!(!mark.children[0].valid);
        assert_eq!(jsp.compare_state(&state), MarkCompare::Equal);
    }

    #[test]
    fn test_missing_sub_mark_fails_to_load() {
        let mut jsp = MultiSyntax::jsp();
        let mark = MultiMark {
            master: HtmlSyntax::new().store_state(),
            master_start: HtmlSyntax::new().store_state(),
            active: Some("java"),
            children: Vec::new(),
        };
        let result = jsp.load_state(Some(&SyntaxState::Multi(Box::new(mark))));
        assert_eq!(result, Err(ScanError::MissingSubMark("java")));
    }
}

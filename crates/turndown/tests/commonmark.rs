//! Reference conversion corpus for the built-in CommonMark rules.

use pretty_assertions::assert_eq;
use turndown::{turndown, TurndownOptions};

/// `(name, html, expected markdown, options)`
type Case = (
    &'static str,
    &'static str,
    &'static str,
    &'static [(&'static str, &'static str)],
);

#[rustfmt::skip]
const CASES: &[Case] = &[
    ("p", "<p>Lorem ipsum</p>", "Lorem ipsum", &[]),
    ("multiple ps", "<p>Lorem</p>\n<p>ipsum</p>\n<p>sit</p>", "Lorem\n\nipsum\n\nsit", &[]),
    ("em", "<em>em element</em>", "_em element_", &[]),
    ("i", "<i>i element</i>", "_i element_", &[]),
    ("strong", "<strong>strong element</strong>", "**strong element**", &[]),
    ("b", "<b>b element</b>", "**b element**", &[]),
    ("code", "<code>code element</code>", "`code element`", &[]),
    ("code containing a backtick", "<code>There is a literal backtick (`) here</code>", "``There is a literal backtick (`) here``", &[]),
    ("code containing three or more backticks", "<code>here are three ``` here are four ```` that's it</code>", "`here are three ``` here are four ```` that's it`", &[]),
    ("code containing one or more backticks", "<code>here are three ``` here are four ```` here is one ` that's it</code>", "``here are three ``` here are four ```` here is one ` that's it``", &[]),
    ("code starting with a backtick", "<code>`starting with a backtick</code>", "`` `starting with a backtick ``", &[]),
    ("code containing markdown syntax", "<code>_emphasis_</code>", "`_emphasis_`", &[]),
    ("code containing markdown syntax in a span", "<code><span>_emphasis_</span></code>", "`_emphasis_`", &[]),
    ("h1", "<h1>Level One Heading</h1>", "Level One Heading\n=================", &[]),
    ("escape = when used as heading", "===", "\\===", &[]),
    ("not escaping = outside of a heading", "A sentence containing =", "A sentence containing =", &[]),
    ("h1 as atx", "<h1>Level One Heading with ATX</h1>", "# Level One Heading with ATX", &[("headingStyle", "atx")]),
    ("h2", "<h2>Level Two Heading</h2>", "Level Two Heading\n-----------------", &[]),
    ("h2 as atx", "<h2>Level Two Heading with ATX</h2>", "## Level Two Heading with ATX", &[("headingStyle", "atx")]),
    ("h3", "<h3>Level Three Heading</h3>", "### Level Three Heading", &[]),
    ("heading with child", "<h4>Level Four Heading with <code>child</code></h4>", "#### Level Four Heading with `child`", &[]),
    ("invalid heading", "<h7>Level Seven Heading?</h7>", "Level Seven Heading?", &[]),
    ("hr", "<hr>", "* * *", &[]),
    ("hr with closing tag", "<hr></hr>", "* * *", &[]),
    ("hr with option", "<hr>", "- - -", &[("hr", "- - -")]),
    ("br", "More<br>after the break", "More  \nafter the break", &[]),
    ("br with visible line-ending", "More<br>after the break", "More\\\nafter the break", &[("br", "\\")]),
    ("img with no alt", "<img src=\"http://example.com/logo.png\" />", "![](http://example.com/logo.png)", &[]),
    ("img with relative src", "<img src=\"logo.png\">", "![](logo.png)", &[]),
    ("img with alt", "<img src=\"logo.png\" alt=\"img with alt\">", "![img with alt](logo.png)", &[]),
    ("img with no src", "<img>", "", &[]),
    ("img with a new line in alt", "<img src=\"logo.png\" alt=\"img with\n    alt\">", "![img with\nalt](logo.png)", &[]),
    ("img with more than one new line in alt", "<img src=\"logo.png\" alt=\"img with\n    \n    alt\">", "![img with\nalt](logo.png)", &[]),
    ("img with new lines in title", "<img src=\"logo.png\" title=\"the\n    \n    title\">", "![](logo.png \"the\ntitle\")", &[]),
    ("a", "<a href=\"http://example.com\">An anchor</a>", "[An anchor](http://example.com)", &[]),
    ("a with title", "<a href=\"http://example.com\" title=\"Title for link\">An anchor</a>", "[An anchor](http://example.com \"Title for link\")", &[]),
    ("a with multiline title", "<a href=\"http://example.com\" title=\"Title for\n    \n    link\">An anchor</a>", "[An anchor](http://example.com \"Title for\nlink\")", &[]),
    ("a with quotes in title", "<a href=\"http://example.com\" title=\"&quot;hello&quot;\">An anchor</a>", "[An anchor](http://example.com \"\\\"hello\\\"\")", &[]),
    ("a with parenthesis in query", "<a href=\"http://example.com?(query)\">An anchor</a>", "[An anchor](http://example.com?\\(query\\))", &[]),
    ("a without a src", "<a id=\"about-anchor\">Anchor without a title</a>", "Anchor without a title", &[]),
    ("a with a child", "<a href=\"http://example.com/code\">Some <code>code</code></a>", "[Some `code`](http://example.com/code)", &[]),
    ("a reference", "<a href=\"http://example.com\">Reference link</a>", "[Reference link][1]\n\n[1]: http://example.com", &[("linkStyle", "referenced")]),
    ("a reference with collapsed style", "<a href=\"http://example.com\">Reference link with collapsed style</a>", "[Reference link with collapsed style][]\n\n[Reference link with collapsed style]: http://example.com", &[("linkStyle", "referenced"), ("linkReferenceStyle", "collapsed")]),
    ("a reference with shortcut style", "<a href=\"http://example.com\">Reference link with shortcut style</a>", "[Reference link with shortcut style]\n\n[Reference link with shortcut style]: http://example.com", &[("linkStyle", "referenced"), ("linkReferenceStyle", "shortcut")]),
    ("pre/code block", "<pre><code>def code_block\n  # 42 &lt; 9001\n  \"Hello world!\"\nend</code></pre>", "    def code_block\n      # 42 < 9001\n      \"Hello world!\"\n    end", &[]),
    ("multiple pre/code blocks", "<pre><code>def first_code_block\n  # 42 &lt; 9001\n  \"Hello world!\"\nend</code></pre>\n\n<p>next:</p>\n\n<pre><code>def second_code_block\n  # 42 &lt; 9001\n  \"Hello world!\"\nend</code></pre>", "    def first_code_block\n      # 42 < 9001\n      \"Hello world!\"\n    end\n\nnext:\n\n    def second_code_block\n      # 42 < 9001\n      \"Hello world!\"\n    end", &[]),
    ("pre/code block with multiple new lines", "<div><pre><code>Multiple new lines\n\n\nshould not be\n\n\nremoved</code></pre></div>", "    Multiple new lines\n    \n    \n    should not be\n    \n    \n    removed", &[]),
    ("fenced pre/code block", "    <pre><code>def a_fenced_code block; end</code></pre>", "```\ndef a_fenced_code block; end\n```", &[("codeBlockStyle", "fenced")]),
    ("pre/code block fenced with ~", "    <pre><code>def a_fenced_code block; end</code></pre>", "~~~\ndef a_fenced_code block; end\n~~~", &[("codeBlockStyle", "fenced"), ("fence", "~~~")]),
    ("escaping ~~~", "<pre>~~~ foo</pre>", "\\~~~ foo", &[]),
    ("not escaping ~~~", "A sentence containing ~~~", "A sentence containing ~~~", &[]),
    ("fenced pre/code block with language", "    <pre><code class=\"language-ruby\">def a_fenced_code block; end</code></pre>", "```ruby\ndef a_fenced_code block; end\n```", &[("codeBlockStyle", "fenced")]),
    ("empty pre does not throw error", "<pre></pre>", "", &[]),
    ("ol", "<ol>\n      <li>Ordered list item 1</li>\n      <li>Ordered list item 2</li>\n      <li>Ordered list item 3</li>\n    </ol>", "1.  Ordered list item 1\n2.  Ordered list item 2\n3.  Ordered list item 3", &[]),
    ("ol with start", "<ol start=\"42\">\n      <li>Ordered list item 42</li>\n      <li>Ordered list item 43</li>\n      <li>Ordered list item 44</li>\n    </ol>", "42.  Ordered list item 42\n43.  Ordered list item 43\n44.  Ordered list item 44", &[]),
    ("list spacing", "<p>A paragraph.</p>\n    <ol>\n      <li>Ordered list item 1</li>\n      <li>Ordered list item 2</li>\n      <li>Ordered list item 3</li>\n    </ol>\n    <p>Another paragraph.</p>\n    <ul>\n      <li>Unordered list item 1</li>\n      <li>Unordered list item 2</li>\n      <li>Unordered list item 3</li>\n    </ul>", "A paragraph.\n\n1.  Ordered list item 1\n2.  Ordered list item 2\n3.  Ordered list item 3\n\nAnother paragraph.\n\n*   Unordered list item 1\n*   Unordered list item 2\n*   Unordered list item 3", &[]),
    ("ul", "<ul>\n      <li>Unordered list item 1</li>\n      <li>Unordered list item 2</li>\n      <li>Unordered list item 3</li>\n    </ul>", "*   Unordered list item 1\n*   Unordered list item 2\n*   Unordered list item 3", &[]),
    ("ul with custom bullet", "<ul>\n      <li>Unordered list item 1</li>\n      <li>Unordered list item 2</li>\n      <li>Unordered list item 3</li>\n    </ul>", "-   Unordered list item 1\n-   Unordered list item 2\n-   Unordered list item 3", &[("bulletListMarker", "-")]),
    ("ul with paragraph", "<ul>\n      <li><p>List item with paragraph</p></li>\n      <li>List item without paragraph</li>\n    </ul>", "*   List item with paragraph\n    \n*   List item without paragraph", &[]),
    ("ol with paragraphs", "<ol>\n      <li>\n        <p>This is a paragraph in a list item.</p>\n        <p>This is a paragraph in the same list item as above.</p>\n      </li>\n      <li>\n        <p>A paragraph in a second list item.</p>\n      </li>\n    </ol>", "1.  This is a paragraph in a list item.\n    \n    This is a paragraph in the same list item as above.\n    \n2.  A paragraph in a second list item.", &[]),
    ("nested uls", "<ul>\n      <li>This is a list item at root level</li>\n      <li>This is another item at root level</li>\n      <li>\n        <ul>\n          <li>This is a nested list item</li>\n          <li>This is another nested list item</li>\n          <li>\n            <ul>\n              <li>This is a deeply nested list item</li>\n              <li>This is another deeply nested list item</li>\n              <li>This is a third deeply nested list item</li>\n            </ul>\n          </li>\n        </ul>\n      </li>\n      <li>This is a third item at root level</li>\n    </ul>", "*   This is a list item at root level\n*   This is another item at root level\n*   *   This is a nested list item\n    *   This is another nested list item\n    *   *   This is a deeply nested list item\n        *   This is another deeply nested list item\n        *   This is a third deeply nested list item\n*   This is a third item at root level", &[]),
    ("nested ols and uls", "<ul>\n      <li>This is a list item at root level</li>\n      <li>This is another item at root level</li>\n      <li>\n        <ol>\n          <li>This is a nested list item</li>\n          <li>This is another nested list item</li>\n          <li>\n            <ul>\n              <li>This is a deeply nested list item</li>\n              <li>This is another deeply nested list item</li>\n              <li>This is a third deeply nested list item</li>\n            </ul>\n          </li>\n        </ol>\n      </li>\n      <li>This is a third item at root level</li>\n    </ul>", "*   This is a list item at root level\n*   This is another item at root level\n*   1.  This is a nested list item\n    2.  This is another nested list item\n    3.  *   This is a deeply nested list item\n        *   This is another deeply nested list item\n        *   This is a third deeply nested list item\n*   This is a third item at root level", &[]),
    ("ul with blockquote", "<ul>\n      <li>\n        <p>A list item with a blockquote:</p>\n        <blockquote>\n          <p>This is a blockquote inside a list item.</p>\n        </blockquote>\n      </li>\n    </ul>", "*   A list item with a blockquote:\n    \n    > This is a blockquote inside a list item.", &[]),
    ("blockquote", "<blockquote>\n      <p>This is a paragraph within a blockquote.</p>\n      <p>This is another paragraph within a blockquote.</p>\n    </blockquote>", "> This is a paragraph within a blockquote.\n> \n> This is another paragraph within a blockquote.", &[]),
    ("nested blockquotes", "<blockquote>\n      <p>This is the first level of quoting.</p>\n      <blockquote>\n        <p>This is a paragraph in a nested blockquote.</p>\n      </blockquote>\n      <p>Back to the first level.</p>\n    </blockquote>", "> This is the first level of quoting.\n> \n> > This is a paragraph in a nested blockquote.\n> \n> Back to the first level.", &[]),
    ("html in blockquote", "<blockquote>\n      <h2>This is a header.</h2>\n      <ol>\n        <li>This is the first list item.</li>\n        <li>This is the second list item.</li>\n      </ol>\n      <p>A code block:</p>\n      <pre><code>return 1 &lt; 2 ? shell_exec('echo $input | $markdown_script') : 0;</code></pre>\n    </blockquote>", "> This is a header.\n> -----------------\n> \n> 1.  This is the first list item.\n> 2.  This is the second list item.\n> \n> A code block:\n> \n>     return 1 < 2 ? shell_exec('echo $input | $markdown_script') : 0;", &[]),
    ("multiple divs", "<div>A div</div>\n    <div>Another div</div>", "A div\n\nAnother div", &[]),
    ("escaping backslashes", "backslash \\", "backslash \\\\", &[]),
    ("escaping headings with #", "### This is not a heading", "\\### This is not a heading", &[]),
    ("not escaping # outside of a heading", "#This is not # a heading", "#This is not # a heading", &[]),
    ("escaping em markdown with *", "To add emphasis, surround text with *. For example: *this is emphasis*", "To add emphasis, surround text with \\*. For example: \\*this is emphasis\\*", &[]),
    ("escaping em markdown with _", "To add emphasis, surround text with _. For example: _this is emphasis_", "To add emphasis, surround text with \\_. For example: \\_this is emphasis\\_", &[]),
    ("not escaping within code", "<pre><code>def this_is_a_method; end;</code></pre>", "    def this_is_a_method; end;", &[]),
    ("escaping strong markdown with *", "To add strong emphasis, surround text with **. For example: **this is strong**", "To add strong emphasis, surround text with \\*\\*. For example: \\*\\*this is strong\\*\\*", &[]),
    ("escaping strong markdown with _", "To add strong emphasis, surround text with __. For example: __this is strong__", "To add strong emphasis, surround text with \\_\\_. For example: \\_\\_this is strong\\_\\_", &[]),
    ("escaping hr markdown with *", "* * *", "\\* \\* \\*", &[]),
    ("escaping hr markdown with -", "- - -", "\\- - -", &[]),
    ("escaping hr markdown with _", "_ _ _", "\\_ \\_ \\_", &[]),
    ("escaping hr markdown without spaces", "***", "\\*\\*\\*", &[]),
    ("escaping hr markdown with more than 3 characters", "* * * * *", "\\* \\* \\* \\* \\*", &[]),
    ("escaping ol markdown", "1984. by George Orwell", "1984\\. by George Orwell", &[]),
    ("not escaping . outside of an ol", "1984.George Orwell wrote 1984.", "1984.George Orwell wrote 1984.", &[]),
    ("escaping ul markdown *", "* An unordered list item", "\\* An unordered list item", &[]),
    ("escaping ul markdown -", "- An unordered list item", "\\- An unordered list item", &[]),
    ("escaping ul markdown +", "+ An unordered list item", "\\+ An unordered list item", &[]),
    ("not escaping - outside of a ul", "Hello-world, 45 - 3 is 42", "Hello-world, 45 - 3 is 42", &[]),
    ("not escaping + outside of a ul", "+1 and another +", "+1 and another +", &[]),
    ("escaping *", "You can use * for multiplication", "You can use \\* for multiplication", &[]),
    ("escaping ** inside strong tags", "<strong>**test</strong>", "**\\*\\*test**", &[]),
    ("escaping _ inside em tags", "<em>test_italics</em>", "_test\\_italics_", &[]),
    ("escaping > as blockquote", "> Blockquote in markdown", "\\> Blockquote in markdown", &[]),
    ("escaping > as blockquote without space", ">Blockquote in markdown", "\\>Blockquote in markdown", &[]),
    ("not escaping > outside of a blockquote", "42 > 1", "42 > 1", &[]),
    ("escaping code", "`not code`", "\\`not code\\`", &[]),
    ("escaping []", "[This] is a sentence with brackets", "\\[This\\] is a sentence with brackets", &[]),
    ("escaping [", "<a href=\"http://www.example.com\">c[iao</a>", "[c\\[iao](http://www.example.com)", &[]),
    ("leading whitespace in heading", "<h3>\n    h3 with leading whitespace</h3>", "### h3 with leading whitespace", &[]),
    ("non-markdown block elements", "Foo\n    <div>Bar</div>\n    Baz", "Foo\n\nBar\n\nBaz", &[]),
    ("non-markdown inline elements", "Foo <span>Bar</span>", "Foo Bar", &[]),
    ("blank inline elements", "Hello <em></em>world", "Hello world", &[]),
    ("blank block elements", "Text before blank div … <div></div> text after blank div", "Text before blank div …\n\ntext after blank div", &[]),
    ("blank inline element with br", "<strong><br></strong>", "", &[]),
    ("whitespace between blocks", "<div><div>Content in a nested div</div></div>\n<div>Content in another div</div>", "Content in a nested div\n\nContent in another div", &[]),
    ("whitespace between inline elements", "<p>I <a href=\"http://example.com/need\">need</a> <a href=\"http://www.example.com/more\">more</a> spaces!</p>", "I [need](http://example.com/need) [more](http://www.example.com/more) spaces!", &[]),
    ("whitespace in inline elements", "Text with no space after the period.<em> Text in em with leading/trailing spaces </em><strong>text in strong with trailing space </strong>", "Text with no space after the period. _Text in em with leading/trailing spaces_ **text in strong with trailing space**", &[]),
    ("preformatted code with leading whitespace", "Four spaces <code>    make an indented code block in Markdown</code>", "Four spaces `    make an indented code block in Markdown`", &[("preformattedCode", "true")]),
    ("preformatted code with trailing whitespace", "<code>A line break  </code> <b> note the spaces</b>", "`A line break  ` **note the spaces**", &[("preformattedCode", "true")]),
    ("preformatted code tightly surrounded", "<b>tight</b><code>code</code><b>wrap</b>", "**tight**`code`**wrap**", &[("preformattedCode", "true")]),
    ("preformatted code loosely surrounded", "<b>not so tight </b><code>code</code><b> wrap</b>", "**not so tight** `code` **wrap**", &[("preformattedCode", "true")]),
    ("preformatted code with newlines", "<code>\n\n nasty\ncode\n\n</code>", "`    nasty code   `", &[("preformattedCode", "true")]),
    ("triple tildes inside code", "<pre><code>~~~\nCode\n~~~\n</code></pre>", "~~~~\n~~~\nCode\n~~~\n~~~~", &[("codeBlockStyle", "fenced"), ("fence", "~~~")]),
    ("triple ticks inside code", "<pre><code>```\nCode\n```\n</code></pre>", "````\n```\nCode\n```\n````", &[("codeBlockStyle", "fenced"), ("fence", "```")]),
    ("four ticks inside code", "<pre><code>````\nCode\n````\n</code></pre>", "`````\n````\nCode\n````\n`````", &[("codeBlockStyle", "fenced"), ("fence", "```")]),
    ("empty line in start/end of code block", "<pre><code>\nCode\n\n</code></pre>", "```\n\nCode\n\n```", &[("codeBlockStyle", "fenced"), ("fence", "```")]),
    ("text separated by a non-breaking space in an element", "<p>Foo<span>&nbsp;</span>Bar</p>", "Foo&nbsp;Bar", &[]),
    ("text separated by ASCII and nonASCII space in an element", "<p>Foo<span>  &nbsp;  </span>Bar</p>", "Foo &nbsp; Bar", &[]),
    ("list-like text with non-breaking spaces", "&nbsp;1. First<br>&nbsp;2. Second", "&nbsp;1. First  \n&nbsp;2. Second", &[]),
    ("element with trailing nonASCII WS followed by nonWS", "<i>foo&nbsp;</i>bar", "_foo_&nbsp;bar", &[]),
    ("element with trailing nonASCII WS followed by nonASCII WS", "<i>foo&nbsp;</i>&nbsp;bar", "_foo_&nbsp;&nbsp;bar", &[]),
    ("element with trailing ASCII WS followed by nonASCII WS", "<i>foo </i>&nbsp;bar", "_foo_ &nbsp;bar", &[]),
    ("element with trailing nonASCII WS followed by ASCII WS", "<i>foo&nbsp;</i> bar", "_foo_&nbsp; bar", &[]),
    ("nonWS followed by element with leading nonASCII WS", "foo<i>&nbsp;bar</i>", "foo&nbsp;_bar_", &[]),
    ("nonASCII WS followed by element with leading nonASCII WS", "foo&nbsp;<i>&nbsp;bar</i>", "foo&nbsp;&nbsp;_bar_", &[]),
    ("nonASCII WS followed by element with leading ASCII WS", "foo&nbsp;<i> bar</i>", "foo&nbsp; _bar_", &[]),
    ("ASCII WS followed by element with leading nonASCII WS", "foo <i>&nbsp;bar</i>", "foo &nbsp;_bar_", &[]),
    ("comment", "<!-- comment -->", "", &[]),
    ("pre/code with comment", "<pre ><code>Hello<!-- comment --> world</code></pre>", "    Hello world", &[]),
    ("trailing whitespace in li", "<ol>\n      <li>Chapter One\n        <ol>\n          <li>Section One</li>\n          <li>Section Two with trailing whitespace </li>\n          <li>Section Three with trailing whitespace </li>\n        </ol>\n      </li>\n      <li>Chapter Two</li>\n      <li>Chapter Three with trailing whitespace  </li>\n    </ol>", "1.  Chapter One\n    1.  Section One\n    2.  Section Two with trailing whitespace\n    3.  Section Three with trailing whitespace\n2.  Chapter Two\n3.  Chapter Three with trailing whitespace", &[]),
    ("multilined and bizarre formatting", "<ul>\n      <li>\n        Indented li with leading/trailing newlines\n      </li>\n      <li>\n        <strong>Strong with trailing space inside li with leading/trailing whitespace </strong> </li>\n      <li>li without whitespace</li>\n      <li> Leading space, text, lots of whitespace …\n                          text\n      </li>\n    </ol>", "*   Indented li with leading/trailing newlines\n*   **Strong with trailing space inside li with leading/trailing whitespace**\n*   li without whitespace\n*   Leading space, text, lots of whitespace … text", &[]),
    ("whitespace in nested inline elements", "Text at root <strong><a href=\"http://www.example.com\">link text with trailing space in strong </a></strong>more text at root", "Text at root **[link text with trailing space in strong](http://www.example.com)** more text at root", &[]),
    ("elements with a single void element", "<p><img src=\"http://example.com/logo.png\" /></p>", "![](http://example.com/logo.png)", &[]),
    ("elements with a nested void element", "<p><span><img src=\"http://example.com/logo.png\" /></span></p>", "![](http://example.com/logo.png)", &[]),
    ("text separated by a space in an element", "<p>Foo<span> </span>Bar</p>", "Foo Bar", &[]),
    ("escaping multiple asterisks", "<p>* * ** It aims to be*</p>", "\\* \\* \\*\\* It aims to be\\*", &[]),
    ("escaping delimiters around short words and numbers", "<p>_Really_? Is that what it _is_? A **2000** year-old computer?</p>", "\\_Really\\_? Is that what it \\_is\\_? A \\*\\*2000\\*\\* year-old computer?", &[]),
    ("escaping * performance", "fasdf *883 asdf wer qweasd fsd asdf asdfaqwe rqwefrsdf", "fasdf \\*883 asdf wer qweasd fsd asdf asdfaqwe rqwefrsdf", &[]),
];

fn convert(html: &str, settings: &[(&str, &str)]) -> String {
    let mut options = TurndownOptions::default();
    for (key, value) in settings {
        options.set(key, value).unwrap();
    }
    turndown(html, &options).unwrap()
}

#[test]
fn test_reference_corpus() {
    for (name, html, expected, settings) in CASES {
        assert_eq!(convert(html, settings), *expected, "case {name:?}");
    }
}

#[test]
fn test_corpus_names_are_unique() {
    let mut names: Vec<_> = CASES.iter().map(|case| case.0).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), CASES.len());
}

use pdfforge::BuiltinFont;

#[test]
fn base_font_names_match_the_standard_14_set() {
    assert_eq!(BuiltinFont::Helvetica.base_font_name(), "Helvetica");
    assert_eq!(BuiltinFont::HelveticaBold.base_font_name(), "Helvetica-Bold");
    assert_eq!(BuiltinFont::HelveticaOblique.base_font_name(), "Helvetica-Oblique");
    assert_eq!(BuiltinFont::HelveticaBoldOblique.base_font_name(), "Helvetica-BoldOblique");
    assert_eq!(BuiltinFont::TimesRoman.base_font_name(), "Times-Roman");
    assert_eq!(BuiltinFont::TimesBold.base_font_name(), "Times-Bold");
    assert_eq!(BuiltinFont::TimesItalic.base_font_name(), "Times-Italic");
    assert_eq!(BuiltinFont::TimesBoldItalic.base_font_name(), "Times-BoldItalic");
    assert_eq!(BuiltinFont::Courier.base_font_name(), "Courier");
    assert_eq!(BuiltinFont::CourierBold.base_font_name(), "Courier-Bold");
    assert_eq!(BuiltinFont::CourierOblique.base_font_name(), "Courier-Oblique");
    assert_eq!(BuiltinFont::CourierBoldOblique.base_font_name(), "Courier-BoldOblique");
    assert_eq!(BuiltinFont::Symbol.base_font_name(), "Symbol");
    assert_eq!(BuiltinFont::ZapfDingbats.base_font_name(), "ZapfDingbats");
}

#[test]
fn every_builtin_font_has_a_unique_base_name() {
    let names: std::collections::HashSet<&str> = [
        BuiltinFont::TimesRoman,
        BuiltinFont::TimesBold,
        BuiltinFont::TimesItalic,
        BuiltinFont::TimesBoldItalic,
        BuiltinFont::Helvetica,
        BuiltinFont::HelveticaBold,
        BuiltinFont::HelveticaOblique,
        BuiltinFont::HelveticaBoldOblique,
        BuiltinFont::Courier,
        BuiltinFont::CourierBold,
        BuiltinFont::CourierOblique,
        BuiltinFont::CourierBoldOblique,
        BuiltinFont::Symbol,
        BuiltinFont::ZapfDingbats,
    ]
    .iter()
    .map(|f| f.base_font_name())
    .collect();
    assert_eq!(names.len(), 14);
}

//! Views for images, effects and materials.

use super::{element_view, TypedElement};
use crate::document::Node;
use crate::field::parse_list;

element_view!(
    /// An `<image>` in `library_images`.
    Image => Image
);

impl<'a> Image<'a> {
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.0.display_name()
    }

    /// File reference of the image.
    ///
    /// COLLADA 1.4 stores it as the text of `<init_from>`, 1.5 nests it in
    /// `<init_from><ref>`; both are accepted.
    #[must_use]
    pub fn init_from(&self) -> Option<&'a str> {
        let init = self.0.child("init_from")?;
        init.child_text("ref").or_else(|| init.text())
    }
}

element_view!(
    /// An `<effect>`.
    Effect => Effect
);

impl<'a> Effect<'a> {
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.0.display_name()
    }

    #[must_use]
    pub fn profile_common(&self) -> Option<ProfileCommon<'a>> {
        self.0.child_as("profile_COMMON")
    }

    /// Parameters declared directly on the effect.
    #[must_use]
    pub fn new_params(&self) -> Vec<NewParam<'a>> {
        self.0.children_as("newparam")
    }

    #[must_use]
    pub fn param(&self, sid: &str) -> Option<NewParam<'a>> {
        find_param(self.new_params(), sid)
    }
}

element_view!(
    /// The `<profile_COMMON>` rendering profile of an effect.
    ProfileCommon => ProfileCommon
);

impl<'a> ProfileCommon<'a> {
    #[must_use]
    pub fn new_params(&self) -> Vec<NewParam<'a>> {
        self.0.children_as("newparam")
    }

    /// Look up a parameter by `sid`.
    ///
    /// The profile's own parameters are searched first, then those of the
    /// enclosing effect.
    #[must_use]
    pub fn param(&self, sid: &str) -> Option<NewParam<'a>> {
        find_param(self.new_params(), sid)
            .or_else(|| self.0.ancestor_as::<Effect>()?.param(sid))
    }

    #[must_use]
    pub fn technique(&self) -> Option<Technique<'a>> {
        self.0.child_as("technique")
    }
}

fn find_param<'a>(params: Vec<NewParam<'a>>, sid: &str) -> Option<NewParam<'a>> {
    params.into_iter().find(|param| param.sid() == Some(sid))
}

element_view!(
    /// A `<newparam>`. Holds either a surface or a sampler (or neither).
    NewParam => NewParam
);

impl<'a> NewParam<'a> {
    #[must_use]
    pub fn sid(&self) -> Option<&'a str> {
        self.0.sid()
    }

    #[must_use]
    pub fn sampler_2d(&self) -> Option<Sampler2D<'a>> {
        self.0.child_as("sampler2D")
    }

    #[must_use]
    pub fn surface(&self) -> Option<Surface<'a>> {
        self.0.child_as("surface")
    }
}

element_view!(
    /// A COLLADA 1.4 `<surface>` parameter.
    Surface => Surface
);

impl<'a> Surface<'a> {
    /// The `type` attribute, e.g. `2D`.
    #[must_use]
    pub fn surface_type(&self) -> Option<&'a str> {
        self.0.attribute("type")
    }

    /// Id of the image the surface is initialised from.
    #[must_use]
    pub fn init_from(&self) -> Option<&'a str> {
        self.0.child_text("init_from")
    }

    #[must_use]
    pub fn format(&self) -> Option<&'a str> {
        self.0.child_text("format")
    }
}

element_view!(
    /// A `<sampler2D>` parameter.
    Sampler2D => Sampler2D
);

impl<'a> Sampler2D<'a> {
    /// Sid of the surface parameter sampled (COLLADA 1.4).
    #[must_use]
    pub fn source(&self) -> Option<&'a str> {
        self.0.child_text("source")
    }

    /// Url of the sampled image (COLLADA 1.5 `<instance_image>`).
    #[must_use]
    pub fn instance_image_url(&self) -> Option<&'a str> {
        self.0.child("instance_image")?.attribute("url")
    }

    #[must_use]
    pub fn min_filter(&self) -> Option<&'a str> {
        self.0.child_text("minfilter")
    }

    #[must_use]
    pub fn mag_filter(&self) -> Option<&'a str> {
        self.0.child_text("magfilter")
    }

    #[must_use]
    pub fn wrap_s(&self) -> Option<&'a str> {
        self.0.child_text("wrap_s")
    }

    #[must_use]
    pub fn wrap_t(&self) -> Option<&'a str> {
        self.0.child_text("wrap_t")
    }
}

element_view!(
    /// A `<technique>` of a profile.
    Technique => Technique
);

impl<'a> Technique<'a> {
    #[must_use]
    pub fn sid(&self) -> Option<&'a str> {
        self.0.sid()
    }

    /// The shading model element (`phong`, `lambert`, `blinn` or `constant`).
    #[must_use]
    pub fn shader(&self) -> Option<Shader<'a>> {
        self.0.children().find_map(Shader::cast)
    }
}

element_view!(
    /// A shading model. The tag names the model.
    Shader => Shader
);

impl<'a> Shader<'a> {
    /// `phong`, `lambert`, `blinn` or `constant`.
    #[must_use]
    pub fn model(&self) -> &'a str {
        self.0.tag()
    }

    #[must_use]
    pub fn emission(&self) -> Option<ColorOrTexture<'a>> {
        self.0.child_as("emission")
    }

    #[must_use]
    pub fn ambient(&self) -> Option<ColorOrTexture<'a>> {
        self.0.child_as("ambient")
    }

    #[must_use]
    pub fn diffuse(&self) -> Option<ColorOrTexture<'a>> {
        self.0.child_as("diffuse")
    }

    #[must_use]
    pub fn specular(&self) -> Option<ColorOrTexture<'a>> {
        self.0.child_as("specular")
    }

    #[must_use]
    pub fn shininess(&self) -> Option<f64> {
        self.float_channel("shininess")
    }

    #[must_use]
    pub fn transparency(&self) -> Option<f64> {
        self.float_channel("transparency")
    }

    fn float_channel(&self, name: &str) -> Option<f64> {
        self.0.child(name)?.child_text("float")?.parse().ok()
    }
}

element_view!(
    /// A shader channel holding a color or a texture reference.
    ColorOrTexture => ColorOrTexture
);

impl<'a> ColorOrTexture<'a> {
    #[must_use]
    pub fn color(&self) -> Option<Color<'a>> {
        self.0.child_as("color")
    }

    #[must_use]
    pub fn texture(&self) -> Option<Texture<'a>> {
        self.0.child_as("texture")
    }
}

element_view!(
    /// A `<texture>` reference inside a shader channel.
    Texture => Texture
);

impl<'a> Texture<'a> {
    /// Sid of the sampler parameter, or an image id for some exporters.
    #[must_use]
    pub fn texture(&self) -> Option<&'a str> {
        self.0.attribute("texture")
    }

    /// Texture coordinate set symbol, bound in `<bind_vertex_input>`.
    #[must_use]
    pub fn texcoord(&self) -> Option<&'a str> {
        self.0.attribute("texcoord")
    }
}

element_view!(
    /// A `<color>` value.
    Color => Color
);

impl Color<'_> {
    /// The color as RGBA. A missing alpha component defaults to 1.
    #[must_use]
    pub fn rgba(&self) -> Option<[f64; 4]> {
        match parse_list::<f64>(self.0.text()?)?.as_slice() {
            [r, g, b, a] => Some([*r, *g, *b, *a]),
            [r, g, b] => Some([*r, *g, *b, 1.0]),
            _ => None,
        }
    }
}

element_view!(
    /// A `<material>`.
    Material => Material
);

impl<'a> Material<'a> {
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        self.0.display_name()
    }

    #[must_use]
    pub fn instance_effect(&self) -> Option<InstanceEffect<'a>> {
        self.0.child_as("instance_effect")
    }

    /// The effect this material instantiates.
    #[must_use]
    pub fn effect(&self) -> Option<Effect<'a>> {
        self.instance_effect()?.effect()
    }
}

element_view!(
    /// An `<instance_effect>`.
    InstanceEffect => InstanceEffect
);

impl<'a> InstanceEffect<'a> {
    #[must_use]
    pub fn url(&self) -> Option<&'a str> {
        self.0.attribute("url")
    }

    #[must_use]
    pub fn effect(&self) -> Option<Effect<'a>> {
        self.0.document().resolve(self.url()?)
    }
}

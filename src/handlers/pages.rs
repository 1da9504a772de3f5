//! 页面处理器
//! 服务端只回静态 HTML 壳, 数据交互全部走 /api 接口

use axum::response::Html;

/// 首页 (公开)
pub async fn home() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>FitPlan</title></head>
<body>
  <h1>FitPlan</h1>
  <p>Track your workout programs.</p>
  <nav><a href="/auth/login">Log in</a> | <a href="/auth/register">Register</a></nav>
</body>
</html>"#,
    )
}

/// 登录页
pub async fn login_page() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Log in - FitPlan</title></head>
<body>
  <h1>Log in</h1>
  <form id="login-form" data-endpoint="/api/auth/login">
    <input type="email" name="email" placeholder="Email" required>
    <input type="password" name="password" placeholder="Password" required>
    <button type="submit">Log in</button>
  </form>
</body>
</html>"#,
    )
}

/// 注册页
pub async fn register_page() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Register - FitPlan</title></head>
<body>
  <h1>Create account</h1>
  <form id="register-form" data-endpoint="/api/auth/register">
    <input type="email" name="email" placeholder="Email" required>
    <input type="text" name="display_name" placeholder="Display name" required>
    <input type="password" name="password" placeholder="Password" required>
    <button type="submit">Register</button>
  </form>
</body>
</html>"#,
    )
}

/// 个人主页 (受保护)
pub async fn profile_page() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Profile - FitPlan</title></head>
<body>
  <h1>Your profile</h1>
  <div id="profile" data-endpoint="/api/profile"></div>
</body>
</html>"#,
    )
}

/// 训练计划页 (受保护)
pub async fn programs_page() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Programs - FitPlan</title></head>
<body>
  <h1>Your programs</h1>
  <div id="programs" data-endpoint="/api/programs"></div>
</body>
</html>"#,
    )
}
